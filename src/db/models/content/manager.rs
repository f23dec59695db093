//! Manager for the content model.
use super::{ContentId, RecordStream};
use crate::db::{ConnectionError, DatabaseConnection, StoreError};
use async_trait::async_trait;
use bson::{doc, Document, RawDocumentBuf};
use futures::StreamExt as _;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find one content record by id.
    ///
    /// # Errors
    /// Errors if the driver fails the lookup or the record cannot be decoded.
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Document>, StoreError> {
        let record = self
            .collection
            .find_one(id.to_filter())
            .await
            .map_err(|err| StoreError::Query(err.to_string()))?;
        record.as_ref().map(decode).transpose()
    }

    /// Scan every content record.
    ///
    /// # Errors
    /// Errors if the cursor cannot be opened.
    async fn find_all(&self) -> Result<RecordStream<'_>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|err| StoreError::Connection(ConnectionError::new(err)))?;
        let records = cursor.map(|record| match record {
            Ok(raw) => decode(&raw),
            Err(err) => Err(StoreError::Cursor(err.to_string())),
        });
        Ok(records.boxed())
    }
}

/// Decode a raw record, the only place a malformed record is detected.
fn decode(raw: &RawDocumentBuf) -> Result<Document, StoreError> {
    raw.to_document()
        .map_err(|err| StoreError::Decode(err.to_string()))
}
