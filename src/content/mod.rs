//! Content retrieval: the normalized content schema, the mapping of raw store
//! records onto it, and the read operations served over gRPC.
use chrono::{DateTime, Utc};

use crate::proto;

/// Mapping of loosely-typed records onto [`Content`].
pub mod mapper;
/// Read operations over the content collection.
pub mod query;

/// A content record, normalized for transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    /// Hex form of a generated id, or a string id verbatim.
    pub id: String,
    /// Empty when absent from the record.
    pub title: String,
    /// Empty when absent from the record.
    pub description: String,
    /// Creation time, if the record carries a readable one.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, if the record carries a readable one.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Content> for proto::Content {
    fn from(value: Content) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            created_at: value.created_at.map(to_timestamp),
            updated_at: value.updated_at.map(to_timestamp),
        }
    }
}

/// Convert to a protobuf timestamp.
fn to_timestamp(time: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: time.timestamp(),
        // Sub-second nanos are always below 2e9, leap seconds included.
        nanos: i32::try_from(time.timestamp_subsec_nanos()).unwrap_or(i32::MAX),
    }
}
