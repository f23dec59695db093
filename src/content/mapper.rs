//! Every field is read through a fixed, ordered table of interpretations. The
//! first interpretation that accepts the value wins; when none does the field
//! is left empty. Mapping therefore never fails, whatever shape a record has.
use bson::{Bson, Document};
use chrono::{DateTime, Utc};

use super::Content;

/// One way of reading a field value, `None` when the value has another shape.
type Interpretation<T> = fn(&Bson) -> Option<T>;

/// `_id`: generated id first, then a plain string.
const IDENTIFIER: &[Interpretation<String>] = &[object_id_hex, plain_string];
/// `title`, `description`.
const TEXT: &[Interpretation<String>] = &[plain_string];
/// `createdAt`, `updatedAt`.
const TIMESTAMP: &[Interpretation<DateTime<Utc>>] = &[native_datetime, epoch_millis, rfc3339];

/// Map a raw record onto [`Content`].
///
/// Missing or unexpected fields come out empty (`String::new()` or `None`).
/// A record without a usable `_id` maps to an empty `id`.
#[must_use]
pub fn map_document(document: &Document) -> Content {
    Content {
        id: interpret(document, "_id", IDENTIFIER).unwrap_or_default(),
        title: interpret(document, "title", TEXT).unwrap_or_default(),
        description: interpret(document, "description", TEXT).unwrap_or_default(),
        created_at: interpret(document, "createdAt", TIMESTAMP),
        updated_at: interpret(document, "updatedAt", TIMESTAMP),
    }
}

/// Read `field` with the first interpretation in `table` that accepts it.
fn interpret<T>(document: &Document, field: &str, table: &[Interpretation<T>]) -> Option<T> {
    let value = document.get(field)?;
    table.iter().find_map(|read| read(value))
}

/// Store-generated id, as 24 hex characters.
fn object_id_hex(value: &Bson) -> Option<String> {
    match *value {
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        _ => None,
    }
}

/// Any string, verbatim.
fn plain_string(value: &Bson) -> Option<String> {
    match *value {
        Bson::String(ref text) => Some(text.clone()),
        _ => None,
    }
}

/// Native BSON date.
fn native_datetime(value: &Bson) -> Option<DateTime<Utc>> {
    match *value {
        Bson::DateTime(time) => DateTime::from_timestamp_millis(time.timestamp_millis()),
        _ => None,
    }
}

/// Integers count milliseconds since the Unix epoch, like a BSON date.
fn epoch_millis(value: &Bson) -> Option<DateTime<Utc>> {
    match *value {
        Bson::Int64(millis) => DateTime::from_timestamp_millis(millis),
        Bson::Int32(millis) => DateTime::from_timestamp_millis(i64::from(millis)),
        _ => None,
    }
}

/// RFC 3339 text, e.g. `2024-05-01T10:30:00Z`.
fn rfc3339(value: &Bson) -> Option<DateTime<Utc>> {
    match *value {
        Bson::String(ref text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        _ => None,
    }
}
