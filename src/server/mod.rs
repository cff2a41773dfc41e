//! Axum query layer over the hanzi dictionary engine.

pub mod handlers;
pub mod params;
pub mod response;

use std::{
    net::SocketAddr,
    sync::Arc,
};

use axum::{
    handler::Handler,
    middleware,
    routing::{
        get,
        MethodRouter,
    },
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::{
    core::BushouError,
    dictionary::HanziEngine,
    radicals::RadicalTable,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn HanziEngine>,
    pub radicals: Arc<RadicalTable>,
}

impl AppState {
    pub fn new(engine: Arc<dyn HanziEngine>, radicals: Arc<RadicalTable>) -> Self {
        Self { engine, radicals }
    }
}

/// GET plus CORS preflight; every other method is answered with a JSON 405.
fn read_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).options(response::preflight).fallback(response::method_not_allowed)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/decompose", read_only(handlers::decompose))
        .route("/api/decompose-many", read_only(handlers::decompose_many))
        .route("/api/define", read_only(handlers::define))
        .route("/api/define-many", read_only(handlers::define_many))
        .route("/api/examples", read_only(handlers::examples))
        .route("/api/dictionary-search", read_only(handlers::dictionary_search))
        .route("/api/search", read_only(handlers::search))
        .route("/api/component-exists", read_only(handlers::component_exists))
        .route("/api/characters-from-component", read_only(handlers::characters_from_component))
        .route("/api/radicals", read_only(handlers::radicals))
        .fallback(response::not_found)
        .layer(middleware::map_response(response::add_cors_headers))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), BushouError> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Query server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
