//! Document store related module.
use async_trait::async_trait;
use bson::{doc, RawDocumentBuf};
use mongodb::{options::ClientOptions, Client, Collection};
use std::{env, fmt, time::Duration};
use tracing::instrument;

/// Lazy, once-only store initialization.
pub mod init;
/// Models for the document store.
pub mod models;

/// Environment variable holding the store connection string.
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Upper bound on connection setup, including the liveness ping.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Database holding the content collection.
pub const DEFAULT_DATABASE: &str = "Manoyukti";
/// Collection holding content records.
pub const DEFAULT_COLLECTION: &str = "Content";

#[async_trait]
/// Generic document store.
pub trait Db: Send + Sync + 'static {
    /// Handle produced by a successful connection.
    type Connection: Send + Sync + 'static;

    /// Connects to the store and verifies it is alive.
    ///
    /// # Errors
    /// Errors if the store cannot be reached or fails its liveness check.
    async fn connect(&self) -> anyhow::Result<Self::Connection>;
}

/// The store could not be reached during initialization.
///
/// Cloned out to every caller once initialization has failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not connect to the document store: {message}")]
pub struct ConnectionError {
    /// Rendered cause, including its chain.
    message: String,
}

impl ConnectionError {
    /// Create a connection error from any displayable cause.
    pub fn new(cause: impl fmt::Display) -> Self {
        Self {
            message: cause.to_string(),
        }
    }
}

/// Failures of a content read.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store unreachable, either at initialization or when a scan starts.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// No record matches the requested identifier.
    #[error("no content found with id `{0}`")]
    NotFound(String),
    /// A single record could not be decoded.
    #[error("could not decode record: {0}")]
    Decode(String),
    /// The cursor failed part way through a scan.
    #[error("cursor failed during scan: {0}")]
    Cursor(String),
    /// A single-record lookup failed in the driver.
    #[error("query failed: {0}")]
    Query(String),
}

/// Where to find the content collection.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string. `None` means it was never configured.
    pub url: Option<String>,
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Bound on connection setup.
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Build a config whose connection string comes from `DATABASE_URL`.
    #[must_use]
    pub fn from_env(database: &str, collection: &str) -> Self {
        Self {
            url: env::var(DATABASE_URL).ok().filter(|url| !url.is_empty()),
            database: database.to_owned(),
            collection: collection.to_owned(),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Connects to a MongoDB deployment.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    /// Connection settings.
    config: StoreConfig,
}

impl MongoConnector {
    /// Create a connector. Nothing is dialled until [`Db::connect`].
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

/// Live connection to the content collection.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    /// Driver client, kept alive for the life of the process.
    pub client: Client,
    /// Content collection, read as raw BSON so that decoding happens per record.
    pub collection: Collection<RawDocumentBuf>,
}

#[async_trait]
impl Db for MongoConnector {
    type Connection = DatabaseConnection;

    #[instrument(level = "trace", skip(self))]
    async fn connect(&self) -> anyhow::Result<DatabaseConnection> {
        let Some(url) = self.config.url.as_deref() else {
            anyhow::bail!("`{DATABASE_URL}` is not set");
        };
        let timeout = self.config.connect_timeout;
        let setup = async {
            let mut options = ClientOptions::parse(url).await?;
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
            let client = Client::with_options(options)?;
            client.database("admin").run_command(doc! { "ping": 1 }).await?;
            Ok::<_, mongodb::error::Error>(client)
        };
        let client = tokio::time::timeout(timeout, setup)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {timeout:?}"))??;
        tracing::debug!(
            "Ping succeeded, using collection `{}.{}`",
            self.config.database,
            self.config.collection
        );
        let collection = client
            .database(&self.config.database)
            .collection::<RawDocumentBuf>(&self.config.collection);
        Ok(DatabaseConnection { client, collection })
    }
}
