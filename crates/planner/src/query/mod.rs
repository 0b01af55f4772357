pub mod ast;
pub mod builder;
pub mod compiler;
pub mod dialect;
pub mod eval;
pub mod filter;
pub mod join;
pub mod macros;
pub mod predicate;
pub mod renderer;
pub mod schema;
pub mod specification;
