//! Store models.

/// Content records and the ways of reading them.
pub mod content;
