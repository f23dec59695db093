//! Upstream calls to the content service.
use anyhow::Context as _;
use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

use crate::proto::{self, content_service_client::ContentServiceClient, ListContentRequest};

/// Default address of the content service.
pub const DEFAULT_CONTENT_SERVICE_ADDR: &str = "http://127.0.0.1:50051";

/// Timeout for establishing the channel to the content service.
pub const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the content list rendered into the sitemap.
#[async_trait]
pub trait ContentLister: Send + Sync {
    /// Every content record, in upstream order.
    ///
    /// # Errors
    /// Errors if the upstream call fails for any reason.
    async fn list_all(&self) -> anyhow::Result<Vec<proto::Content>>;
}

#[async_trait]
impl ContentLister for ContentServiceClient<Channel> {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_all(&self) -> anyhow::Result<Vec<proto::Content>> {
        // Clones share the underlying channel.
        let mut client = self.clone();
        let response = client
            .list_content(ListContentRequest {})
            .await
            .context("ListContent call to the content service failed")?;
        Ok(response.into_inner().contents)
    }
}

/// Client over a lazily connected channel, dialled on the first request.
///
/// # Errors
/// Errors if `addr` is not a valid URI.
pub fn connect_lazy(addr: &str) -> anyhow::Result<ContentServiceClient<Channel>> {
    let channel = Endpoint::from_shared(addr.to_owned())
        .with_context(|| format!("Invalid content service address `{addr}`"))?
        .connect_timeout(UPSTREAM_CONNECT_TIMEOUT)
        .connect_lazy();
    Ok(ContentServiceClient::new(channel))
}

/// Turn a configured address into a URI tonic can dial.
///
/// `:50051` becomes `http://127.0.0.1:50051`, `host:port` becomes
/// `http://host:port`, and URIs with a scheme are kept as they are.
///
/// # Errors
/// Errors if the result is still not a valid URI.
pub fn normalize_endpoint(addr: &str) -> Result<String, String> {
    let addr = addr.trim();
    let normalized = if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_owned()
    } else if addr.starts_with(':') {
        format!("http://127.0.0.1{addr}")
    } else {
        format!("http://{addr}")
    };
    Endpoint::from_shared(normalized.clone())
        .map(|_| normalized)
        .map_err(|err| format!("invalid content service address `{addr}`: {err}"))
}
