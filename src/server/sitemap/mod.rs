//! Serve an XML sitemap of the content collection.
#![allow(
    clippy::exit,
    clippy::unused_async,
    clippy::module_name_repetitions
)]
use actix_http::body::MessageBody;
use actix_service::ServiceFactory;
use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse, HttpServer,
};
use std::{io, process, sync::Arc};
use tracing_actix_web::{RootSpan, TracingLogger};
use url::Url;

use crate::server::errors::{ErrorResponse, HTTPError};
use crate::server::tracing::{SitemapRootSpanBuilder, LOCATIONS_FIELD};

use self::render::Sitemap;
use self::state::{App as AppState, Global};

/// Calls to the content service.
pub mod client;
/// XML rendering.
pub mod render;
/// Server state.
pub mod state;

/// Default port of the sitemap service.
pub const DEFAULT_PORT: u16 = 8080;
/// Default prefix of sitemap locations.
pub const DEFAULT_BASE_URL: &str = "https://example.com";
/// The only route.
pub const SITEMAP_PATH: &str = "/sitemap.xml";
/// Content type of a rendered sitemap.
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml";

/// Render the sitemap from a fresh content list.
///
/// Nothing is cached, every request lists the whole collection upstream.
#[tracing::instrument(skip(data, root_span))]
pub async fn sitemap<T: Global + 'static>(data: web::Data<T>, root_span: RootSpan) -> HttpResponse {
    match data.lister().list_all().await {
        Ok(contents) => {
            let sitemap = Sitemap::build(data.base_url(), &contents);
            root_span.record(LOCATIONS_FIELD, sitemap.len());
            tracing::debug!("Rendering sitemap with {} locations", sitemap.len());
            HttpResponse::Ok()
                .content_type(SITEMAP_CONTENT_TYPE)
                .body(sitemap.into_xml())
        }
        Err(err) => {
            tracing::error!("Failed to fetch content list: {err:?}");
            HttpResponse::InternalServerError().json(ErrorResponse::from(HTTPError::UpstreamError))
        }
    }
}

/// Serve the sitemap over HTTP.
///
/// The channel to the content service is opened lazily, so the server starts
/// even while the content service is down.
#[actix_web::main]
pub async fn serve_sitemap(
    bind: &str,
    port: u16,
    content_service_addr: &str,
    base_url: Url,
) -> io::Result<()> {
    tracing::info!(
        "Running Sitemap Service for {base_url} on http://{bind}:{port}{SITEMAP_PATH}, reading content from {content_service_addr}."
    );

    let lister = match client::connect_lazy(content_service_addr) {
        Ok(lister) => lister,
        Err(err) => {
            tracing::error!("error: could not set up the content service client.");
            tracing::error!("Error: {:?}", err);
            process::exit(1);
        }
    };
    let state = AppState {
        lister: Arc::new(lister),
        base_url,
    };

    HttpServer::new(move || init_app(&state))
        .bind((bind, port))?
        .run()
        .await
}

/// Initialize the application and its single route.
///
/// # Arguments
/// * `state` - The application state
pub fn init_app<T: Global + Clone + 'static>(
    state: &T,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    App::new()
        .app_data(web::Data::new(state.clone()))
        .wrap(TracingLogger::<SitemapRootSpanBuilder>::new())
        .route(SITEMAP_PATH, web::get().to(sitemap::<T>))
}
