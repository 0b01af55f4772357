use crate::{
    commands::{Commands, ConnectionArgs},
    conn::{ConnectionSettings, page_request, test_connection},
    env::EnvManager,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use engine_runtime::{
    execution::pager::PagedExecutor,
    repositories::{
        game_version::{GameVersionFilter, GameVersionRepository},
        mapping_type::{MappingTypeFilter, MappingTypeRepository},
        release::{ReleaseFilter, ReleaseRepository},
    },
    services::{
        game_version::GameVersionService, mapping_type::MappingTypeService,
        release::ReleaseService,
    },
};
use planner::query::{
    compiler::{Statement, StatementCompiler},
    dialect::{self, Dialect},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(name = "mmq", version = "0.0.1", about = "Mapping data query tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, &shutdown).await {
        Ok(()) => ExitCode::Success,
        Err(CliError::ShutdownRequested) => {
            info!("Query cancelled");
            ExitCode::ShutdownRequested
        }
        Err(e) if shutdown.is_shutdown_requested() => {
            info!("Stopped after shutdown request: {e}");
            ExitCode::ShutdownRequested
        }
        Err(e) => {
            error!("{e}");
            ExitCode::GeneralError
        }
    };
    std::process::exit(code.as_i32());
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    match command {
        Commands::Releases {
            conn,
            page,
            name_regex,
            game_version_id,
            mapping_type_id,
            is_snapshot,
            mapping_id,
            user_id,
        } => {
            let env = load_env(&conn)?;
            let request = page_request(&page, &env)?;
            let pager = open_pager(&conn, &env).await?;
            let repository = ReleaseRepository::new(pager).with_cancellation(shutdown.cancel_token());

            let filter = ReleaseFilter {
                name_regex,
                game_version_id,
                mapping_type_id,
                is_snapshot,
                mapping_id,
                user_id,
            };
            let page_result = ReleaseService::new(repository).get_all(&filter, &request).await?;
            output::emit(&page_result, page.output.as_deref()).await?;
        }
        Commands::MappingTypes {
            conn,
            page,
            name_regex,
            editable,
            externally_visible_only,
        } => {
            let env = load_env(&conn)?;
            let request = page_request(&page, &env)?;
            let pager = open_pager(&conn, &env).await?;
            let repository =
                MappingTypeRepository::new(pager).with_cancellation(shutdown.cancel_token());

            let filter = MappingTypeFilter {
                name_regex,
                editable,
                externally_visible_only,
            };
            let page_result = MappingTypeService::new(repository)
                .get_all(&filter, &request)
                .await?;
            output::emit(&page_result, page.output.as_deref()).await?;
        }
        Commands::GameVersions {
            conn,
            page,
            name_regex,
            is_pre_release,
            is_snapshot,
        } => {
            let env = load_env(&conn)?;
            let request = page_request(&page, &env)?;
            let pager = open_pager(&conn, &env).await?;
            let repository =
                GameVersionRepository::new(pager).with_cancellation(shutdown.cancel_token());

            let filter = GameVersionFilter {
                name_regex,
                is_pre_release,
                is_snapshot,
            };
            let page_result = GameVersionService::new(repository)
                .get_all(&filter, &request)
                .await?;
            output::emit(&page_result, page.output.as_deref()).await?;
        }
        Commands::Explain {
            dialect,
            page,
            name_regex,
            game_version_id,
            mapping_id,
        } => {
            let request = page_request(&page, &EnvManager::new())?;
            let filter = ReleaseFilter {
                name_regex,
                game_version_id,
                mapping_id,
                ..Default::default()
            };
            let spec = ReleaseRepository::search_spec(&filter, &request)?;
            let dialect = parse_dialect(&dialect)?;
            let compiled = StatementCompiler::new(dialect.as_ref()).compile(spec)?;

            let explained = serde_json::json!({
                "dialect": dialect.name(),
                "data": explain(&compiled.data),
                "count": explain(&compiled.count),
            });
            output::emit(&explained, page.output.as_deref()).await?;
        }
        Commands::TestConn { conn } => {
            let env = load_env(&conn)?;
            let settings = ConnectionSettings::resolve(&conn, &env)?;
            test_connection(&settings).await?;
        }
    }

    Ok(())
}

fn load_env(conn: &ConnectionArgs) -> Result<EnvManager, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &conn.env_file {
        env.load_from_file(path)?;
    }
    Ok(env)
}

async fn open_pager(conn: &ConnectionArgs, env: &EnvManager) -> Result<PagedExecutor, CliError> {
    let settings = ConnectionSettings::resolve(conn, env)?;
    let adapter = settings.connect().await?;
    Ok(PagedExecutor::new(adapter.into_shared()))
}

fn parse_dialect(name: &str) -> Result<Box<dyn Dialect>, CliError> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Ok(Box::new(dialect::Postgres)),
        "mysql" | "mariadb" => Ok(Box::new(dialect::MySql)),
        "sqlite" => Ok(Box::new(dialect::Sqlite)),
        other => Err(CliError::InvalidConnectionFormat(other.to_string())),
    }
}

fn explain(statement: &Statement) -> serde_json::Value {
    let params: Vec<String> = statement.params.iter().map(ToString::to_string).collect();
    serde_json::json!({ "sql": statement.sql, "params": params })
}
