//! Command line and process plumbing.

pub mod cli;
