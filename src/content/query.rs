//! Read operations over the content collection.
use bson::Document;
use derive_more::Display;
use futures::{future, StreamExt as _, TryStreamExt as _};
use std::sync::Arc;

use super::{mapper::map_document, Content};
use crate::db::{
    init::ConnectionManager,
    models::content::{ContentId, Manager},
    Db, StoreError,
};

/// Why a record was left out of a scan.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// The record could not be decoded.
    #[display(fmt = "record could not be decoded: {}", _0)]
    Undecodable(String),
    /// The record decoded, but has no usable `_id`.
    #[display(fmt = "record has no usable `_id`")]
    MissingId,
}

/// Told about every record a scan leaves out.
pub trait ScanObserver: Send + Sync {
    /// Called once per skipped record.
    fn skipped(&self, reason: &Skipped);
}

/// Logs skipped records as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ScanObserver for LogObserver {
    fn skipped(&self, reason: &Skipped) {
        tracing::warn!("Skipping content record: {reason}");
    }
}

/// Read access to the content collection.
pub struct ContentQuery<D: Db> {
    /// Shared, lazily opened store connection.
    connections: Arc<ConnectionManager<D>>,
    /// Receives skip events from `list_all`.
    observer: Arc<dyn ScanObserver>,
}

impl<D> ContentQuery<D>
where
    D: Db,
    D::Connection: Manager,
{
    /// Create a query over `connections`, logging skipped records.
    pub fn new(connections: Arc<ConnectionManager<D>>) -> Self {
        Self {
            connections,
            observer: Arc::new(LogObserver),
        }
    }

    /// Report skipped records to `observer` instead of the log.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch one content record.
    ///
    /// `id` is matched as a generated id when it parses as one, otherwise as a
    /// literal string.
    ///
    /// # Errors
    /// `NotFound` when nothing matches, `Connection` when the store is
    /// unreachable, and whatever the lookup itself fails with.
    pub async fn get_by_id(&self, id: &str) -> Result<Content, StoreError> {
        let connection = self.connections.acquire().await?;
        let content_id = ContentId::parse(id);
        let document = connection
            .find_by_id(&content_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(content_id.to_string()))?;
        Ok(map_document(&document))
    }

    /// Fetch every content record.
    ///
    /// Records that cannot be decoded, or that have no identifier, are skipped
    /// and reported to the observer. The scan is neither paginated nor bounded.
    ///
    /// # Errors
    /// `Connection` when the scan cannot start, `Cursor` when it breaks part
    /// way. No partial list is returned.
    pub async fn list_all(&self) -> Result<Vec<Content>, StoreError> {
        let connection = self.connections.acquire().await?;
        connection
            .find_all()
            .await?
            .map(|record| self.collect_or_skip(record))
            .try_filter_map(future::ok)
            .try_collect()
            .await
    }

    /// Keep a mappable record, skip a bad one, or stop the scan.
    fn collect_or_skip(
        &self,
        record: Result<Document, StoreError>,
    ) -> Result<Option<Content>, StoreError> {
        match record {
            Ok(document) => {
                let content = map_document(&document);
                if content.id.is_empty() {
                    self.observer.skipped(&Skipped::MissingId);
                    return Ok(None);
                }
                Ok(Some(content))
            }
            Err(StoreError::Decode(reason)) => {
                self.observer.skipped(&Skipped::Undecodable(reason));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
