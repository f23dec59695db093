//! Network surfaces: the gRPC content server and the HTTP sitemap server.

pub mod content;
pub mod errors;
pub mod sitemap;
pub mod tracing;
