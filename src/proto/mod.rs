//! Generated gRPC types for the content API (`proto/content.proto`).
#![allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::restriction,
    reason = "Generated by tonic-build"
)]

tonic::include_proto!("content.v1");
