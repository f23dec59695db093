//! Running the CLI

// Allow exits because in this file we ideally handle all errors with known exit codes
#![allow(clippy::exit)]

use crate::db::{StoreConfig, DATABASE_URL, DEFAULT_COLLECTION, DEFAULT_DATABASE};
use crate::server::content::{self, serve_content};
use crate::server::sitemap::{
    self,
    client::{normalize_endpoint, DEFAULT_CONTENT_SERVICE_ADDR},
    serve_sitemap,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Content and sitemap services.
/// Each subcommand runs one service in its own process.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service to run
    #[command(subcommand)]
    subcommands: Subcommands,
}

///
#[derive(Clone, clap::Subcommand)]
enum Subcommands {
    /// Serve stored content over gRPC
    Content {
        /// Port on which to serve gRPC.
        #[arg(short, long, default_value_t = content::DEFAULT_PORT)]
        port: u16,
        /// Address to bind to.
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
        /// Database holding the content collection.
        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: String,
        /// Collection holding content records.
        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,
    },
    /// Serve an XML sitemap of the content over HTTP
    Sitemap {
        /// Port on which to serve HTTP.
        #[arg(short, long, default_value_t = sitemap::DEFAULT_PORT)]
        port: u16,
        /// Address to bind to.
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
        /// Address of the content service, e.g. `:50051` or `http://host:50051`.
        #[arg(
            long,
            env = "CONTENT_SERVICE_ADDR",
            default_value = DEFAULT_CONTENT_SERVICE_ADDR,
            value_parser = normalize_endpoint
        )]
        content_service_addr: String,
        /// Prefix of every location in the sitemap.
        #[arg(
            long,
            env = "SITEMAP_BASE_URL",
            default_value = sitemap::DEFAULT_BASE_URL,
            value_parser = parse_base_url
        )]
        base_url: Url,
    },
}

///
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load `.env` from the working directory, if there is one.
///
/// Runs before tracing is set up so that `RUST_LOG` may come from the file.
fn load_env() -> Result<(), dotenv::Error> {
    dotenv::dotenv().map(|_| ())
}

/// Accept only absolute http(s) URLs, which can take extra path segments.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| format!("invalid base URL `{raw}`: {err}"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(format!("base URL `{raw}` must be an http(s) URL"));
    }
    Ok(url)
}

/// Main entrypoint to application
pub fn run() {
    let env_file = load_env();
    init_tracing();
    if let Err(err) = env_file {
        tracing::debug!("No .env file loaded ({err}), proceeding with system environment variables.");
    }
    tracing::debug!("Starting application");
    let cli = Cli::parse();

    match cli.subcommands {
        Subcommands::Content {
            port,
            bind,
            database,
            collection,
        } => {
            let config = StoreConfig::from_env(&database, &collection);
            if config.url.is_none() {
                tracing::warn!("`{DATABASE_URL}` is not set, content requests will fail");
            }
            if let Err(err) = serve_content(&bind, port, config) {
                tracing::error!("Content Service failed: {err:?}");
                std::process::exit(1);
            }
        }
        Subcommands::Sitemap {
            port,
            bind,
            content_service_addr,
            base_url,
        } => {
            if let Err(err) = serve_sitemap(&bind, port, &content_service_addr, base_url) {
                tracing::error!("Sitemap Service failed: {err:?}");
                std::process::exit(1);
            }
        }
    }
}
