//! gRPC server exposing the content collection.
#![allow(clippy::module_name_repetitions)]
use std::{net::SocketAddr, sync::Arc};

use tonic::{transport::Server, Request, Response, Status};

use crate::content::query::ContentQuery;
use crate::db::{
    init::ConnectionManager, models::content::Manager, Db, MongoConnector, StoreConfig,
    StoreError,
};
use crate::proto::{
    content_service_server::{ContentService, ContentServiceServer},
    GetContentByIdRequest, GetContentByIdResponse, ListContentRequest, ListContentResponse,
};

/// Default port of the content service.
pub const DEFAULT_PORT: u16 = 50051;

/// Implementation of the `ContentService` RPCs.
pub struct ContentServer<D: Db> {
    /// Read operations over the collection.
    query: ContentQuery<D>,
}

impl<D> ContentServer<D>
where
    D: Db,
    D::Connection: Manager,
{
    /// Serve `query` over gRPC.
    pub const fn new(query: ContentQuery<D>) -> Self {
        Self { query }
    }
}

#[tonic::async_trait]
impl<D> ContentService for ContentServer<D>
where
    D: Db + 'static,
    D::Connection: Manager + 'static,
{
    #[tracing::instrument(skip(self, request), fields(id = %request.get_ref().id))]
    async fn get_content_by_id(
        &self,
        request: Request<GetContentByIdRequest>,
    ) -> Result<Response<GetContentByIdResponse>, Status> {
        let id = request.into_inner().id;
        if id.is_empty() {
            return Err(Status::invalid_argument("Content id cannot be empty"));
        }
        let content = self.query.get_by_id(&id).await.map_err(|err| {
            tracing::error!("GetContentById failed: {err}");
            Status::from(err)
        })?;
        Ok(Response::new(GetContentByIdResponse {
            content: Some(content.into()),
        }))
    }

    #[tracing::instrument(skip(self, _request))]
    async fn list_content(
        &self,
        _request: Request<ListContentRequest>,
    ) -> Result<Response<ListContentResponse>, Status> {
        let contents = self.query.list_all().await.map_err(|err| {
            tracing::error!("ListContent failed: {err}");
            Status::from(err)
        })?;
        tracing::debug!("Listing {} content records", contents.len());
        Ok(Response::new(ListContentResponse {
            contents: contents.into_iter().map(Into::into).collect(),
        }))
    }
}

impl From<StoreError> for Status {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound(_) => Self::not_found(message),
            StoreError::Connection(_) => Self::unavailable(message),
            StoreError::Cursor(_) => Self::aborted(message),
            StoreError::Decode(_) | StoreError::Query(_) => Self::internal(message),
        }
    }
}

/// Serve the content collection over gRPC until Ctrl-C.
///
/// The store is not dialled here, the first RPC opens the connection.
///
/// # Errors
/// Errors if the address is invalid or the server fails.
#[tokio::main]
pub async fn serve_content(bind: &str, port: u16, config: StoreConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(
        "Running Content Service for `{}.{}` on {addr}.",
        config.database,
        config.collection
    );
    let connections = Arc::new(ConnectionManager::new(MongoConnector::new(config)));
    let service = ContentServer::new(ContentQuery::new(connections));

    Server::builder()
        .add_service(ContentServiceServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;
    tracing::info!("Content Service stopped.");
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
