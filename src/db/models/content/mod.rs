//! Content records as stored, and how they are looked up.
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::BoxStream;
use std::fmt;

use crate::db::StoreError;

pub mod manager;

/// Lazy sequence of records from a collection scan.
///
/// Items that fail with [`StoreError::Decode`] concern a single record, any
/// other error ends the scan.
pub type RecordStream<'conn> = BoxStream<'conn, Result<Document, StoreError>>;

/// Trait for reading content records.
#[async_trait]
pub trait Manager {
    /// Find the record whose `_id` matches `id`.
    ///
    /// # Errors
    /// Errors if the lookup fails or the matching record cannot be decoded.
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Document>, StoreError>;

    /// Scan the whole collection, unfiltered.
    ///
    /// # Errors
    /// Errors if the scan cannot be started.
    async fn find_all(&self) -> Result<RecordStream<'_>, StoreError>;
}

/// Requested content identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentId {
    /// Store-generated id, given as its 24 character hex form.
    Generated(ObjectId),
    /// Any other string id, matched literally.
    Literal(String),
}

impl ContentId {
    /// Interpret `id` as a generated id when it parses as one.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        ObjectId::parse_str(id).map_or_else(|_| Self::Literal(id.to_owned()), Self::Generated)
    }

    /// Filter matching this id on `_id`.
    #[must_use]
    pub fn to_filter(&self) -> Document {
        match *self {
            Self::Generated(oid) => doc! { "_id": oid },
            Self::Literal(ref id) => doc! { "_id": id.as_str() },
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Generated(oid) => write!(formatter, "{}", oid.to_hex()),
            Self::Literal(ref id) => write!(formatter, "{id}"),
        }
    }
}
