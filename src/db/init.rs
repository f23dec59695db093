//! One store connection per process, opened on first use.
use super::{ConnectionError, Db};
use futures::future::{BoxFuture, FutureExt as _, Shared};
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

/// In-flight connection attempt, awaited by every caller.
type Attempt = Shared<BoxFuture<'static, ()>>;

/// Owns the connector and the result of its single connection attempt.
///
/// The first call to [`ConnectionManager::acquire`] starts the attempt on its
/// own task; every later call, including calls racing the first one, gets the
/// same handle or the same error. Dropping a caller only stops that caller
/// from waiting, the attempt still runs to completion and is cached.
/// A failed attempt is never retried, restarting the process is the only way
/// out.
pub struct ConnectionManager<D: Db> {
    /// Produces the connection.
    connector: Arc<D>,
    /// Outcome of the one and only connection attempt.
    handle: Arc<OnceCell<Result<D::Connection, ConnectionError>>>,
    /// Set when the attempt is spawned.
    attempt: OnceLock<Attempt>,
}

impl<D: Db> ConnectionManager<D> {
    /// Create a manager. Does not connect.
    pub fn new(connector: D) -> Self {
        Self {
            connector: Arc::new(connector),
            handle: Arc::new(OnceCell::new()),
            attempt: OnceLock::new(),
        }
    }

    /// Shared connection handle, connecting on first use.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Errors with the cached [`ConnectionError`] if the first attempt failed.
    pub async fn acquire(&self) -> Result<&D::Connection, ConnectionError> {
        if !self.handle.initialized() {
            self.attempt.get_or_init(|| self.spawn_attempt()).clone().await;
        }
        match self.handle.get() {
            Some(outcome) => outcome.as_ref().map_err(Clone::clone),
            None => Err(ConnectionError::new("connection attempt was aborted")),
        }
    }

    /// Whether the connection attempt has already happened.
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }

    /// Run the connector on a detached task that fills `handle`.
    fn spawn_attempt(&self) -> Attempt {
        let connector = Arc::clone(&self.connector);
        let handle = Arc::clone(&self.handle);
        tokio::spawn(async move {
            handle.get_or_init(|| initialize(connector.as_ref())).await;
        })
        .map(|joined| {
            if let Err(err) = joined {
                tracing::error!("Connection attempt did not complete: {err}");
            }
        })
        .boxed()
        .shared()
    }
}

/// Run the connector once and log the outcome.
async fn initialize<D: Db>(connector: &D) -> Result<D::Connection, ConnectionError> {
    match connector.connect().await {
        Ok(connection) => {
            tracing::info!("Connected to document store");
            Ok(connection)
        }
        Err(err) => {
            tracing::error!(
                "error: could not connect to document store. Confirm that DATABASE_URL env var is set correctly."
            );
            tracing::error!("Error: {:?}", err);
            Err(ConnectionError::new(format!("{err:#}")))
        }
    }
}
