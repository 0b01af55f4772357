use crate::{
    commands::{ConnectionArgs, PageArgs},
    env::{DATABASE_FORMAT, DATABASE_URL, EnvManager, PAGE_SIZE},
    error::CliError,
};
use connectors::adapter::{Adapter, DataFormat};
use model::pagination::request::PageRequest;
use std::str::FromStr;
use tracing::{error, info};

/// Where and how to connect, after merging flags with the environment.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub format: DataFormat,
    pub url: String,
}

impl ConnectionSettings {
    /// Flags win over environment variables; the format falls back to the
    /// URL scheme.
    pub fn resolve(args: &ConnectionArgs, env: &EnvManager) -> Result<Self, CliError> {
        let url = args
            .conn_str
            .clone()
            .or_else(|| env.get(DATABASE_URL).map(String::from))
            .ok_or_else(|| {
                CliError::Config(format!("No connection string: pass --conn-str or set {DATABASE_URL}"))
            })?;

        let format = match args.format.as_deref().or_else(|| env.get(DATABASE_FORMAT)) {
            Some(format) => DataFormat::from_str(format)
                .map_err(|_| CliError::InvalidConnectionFormat(format.to_string()))?,
            None => DataFormat::from_url(&url)
                .ok_or_else(|| CliError::InvalidConnectionFormat(url_scheme(&url).to_string()))?,
        };

        Ok(ConnectionSettings { format, url })
    }

    pub async fn connect(&self) -> Result<Adapter, CliError> {
        info!("Connecting to {} database", self.format);
        Adapter::connect(self.format, &self.url).await.map_err(|e| {
            error!("{} connection failed: {}", self.format, e);
            CliError::Connector(e)
        })
    }
}

pub fn page_request(args: &PageArgs, env: &EnvManager) -> Result<PageRequest, CliError> {
    let size = match args.size {
        Some(size) => size,
        None => env.get_parsed(PAGE_SIZE)?.unwrap_or(PageRequest::DEFAULT_SIZE),
    };
    Ok(PageRequest {
        index: args.page,
        size,
        sort: args.sort.clone(),
    })
}

/// Connects and runs a round trip, logging the outcome.
pub async fn test_connection(settings: &ConnectionSettings) -> Result<(), CliError> {
    let adapter = settings.connect().await?;
    info!("Pinging {} database", settings.format);
    adapter.executor().ping().await.map_err(|e| {
        error!("{} ping failed: {}", settings.format, e);
        CliError::Ping(e)
    })?;
    info!("{} ping succeeded", settings.format);
    Ok(())
}

fn url_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(scheme, _)| scheme)
}
