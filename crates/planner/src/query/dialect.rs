//! Per-backend SQL syntax: identifier quoting, placeholders and the regex
//! match operator.

pub trait Dialect: Send + Sync {
    /// Quotes `ident`, doubling any embedded quote character.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Placeholder for the zero-based parameter `index`.
    fn get_placeholder(&self, index: usize) -> String;

    /// `None` when the backend has no built-in regex match.
    fn regex_operator(&self) -> Option<&'static str>;

    fn name(&self) -> &'static str;
}

fn double_quoted(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        double_quoted(ident)
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn regex_operator(&self) -> Option<&'static str> {
        Some("~")
    }

    fn name(&self) -> &'static str {
        "PostgreSQL"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn regex_operator(&self) -> Option<&'static str> {
        Some("REGEXP")
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        double_quoted(ident)
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("?{}", index + 1)
    }

    // REGEXP only exists when an extension registers it.
    fn regex_operator(&self) -> Option<&'static str> {
        None
    }

    fn name(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(Postgres.quote_identifier("na\"me"), r#""na""me""#);
        assert_eq!(MySql.quote_identifier("na`me"), "`na``me`");
        assert_eq!(Sqlite.quote_identifier("id"), r#""id""#);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Postgres.get_placeholder(0), "$1");
        assert_eq!(MySql.get_placeholder(4), "?");
        assert_eq!(Sqlite.get_placeholder(1), "?2");
    }
}
