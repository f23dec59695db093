//! Tracing/logging for the sitemap HTTP server

use std::time::Instant;

use actix_http::body::MessageBody;
use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    HttpMessage,
};
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

/// Requests slower than this many milliseconds are logged as warnings.
/// Every sitemap request waits on a full collection scan upstream.
const SLOW_REQUEST_MS: u128 = 5 * 1000;

/// Root span field holding the number of rendered sitemap locations.
pub const LOCATIONS_FIELD: &str = "sitemap_locations";

/// `DefaultRootSpanBuilder` plus request timings and sitemap size.
pub struct SitemapRootSpanBuilder;

/// When the request started.
struct RequestStart(Instant);

impl RootSpanBuilder for SitemapRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> tracing::Span {
        request.extensions_mut().insert(RequestStart(Instant::now()));

        tracing_actix_web::root_span!(
            request,
            duration_ms = tracing::field::Empty,
            sitemap_locations = tracing::field::Empty,
        )
    }

    fn on_request_end<B: MessageBody>(
        span: tracing::Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        let started = outcome.as_ref().ok().and_then(|response| {
            response
                .request()
                .extensions()
                .get::<RequestStart>()
                .map(|start| start.0)
        });
        if let Some(started) = started {
            let millis = started.elapsed().as_millis();
            span.record("duration_ms", millis);
            if millis > SLOW_REQUEST_MS {
                // Sitemap size is the usual cause, it is already on the span.
                span.in_scope(|| tracing::warn!(duration_ms = millis, "Slow sitemap request"));
            }
        }
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}
