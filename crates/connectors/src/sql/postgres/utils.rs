use crate::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{
    Client, Config, NoTls, Socket,
    config::SslMode,
    tls::{MakeTlsConnect, TlsConnect},
};
use tracing::{error, warn};

/// Opens a client for `url`, honouring its `sslmode`. `prefer` (the
/// libpq default) falls back to plaintext when the TLS handshake fails.
pub async fn connect_client(url: &str) -> Result<Client, ConnectorError> {
    let config: Config = url
        .parse()
        .map_err(|e: tokio_postgres::Error| ConnectorError::InvalidUrl(e.to_string()))?;

    match config.get_ssl_mode() {
        SslMode::Disable => open(&config, NoTls).await,
        SslMode::Prefer => match open(&config, tls_connector()?).await {
            Err(error) => {
                warn!(%error, "Postgres TLS handshake failed, retrying without TLS");
                open(&config, NoTls).await
            }
            connected => connected,
        },
        _ => open(&config, tls_connector()?).await,
    }
}

fn tls_connector() -> Result<MakeTlsConnector, ConnectorError> {
    Ok(MakeTlsConnector::new(TlsConnector::builder().build()?))
}

/// Connects and drives the connection on a background task for as long
/// as the returned client lives.
async fn open<T>(config: &Config, tls: T) -> Result<Client, ConnectorError>
where
    T: MakeTlsConnect<Socket> + Send,
    T::Stream: Send + 'static,
    T::TlsConnect: Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let (client, connection) = config.connect(tls).await?;
    let database = config.get_dbname().unwrap_or_default().to_string();
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, %database, "Postgres connection closed with an error");
        }
    });
    Ok(client)
}
