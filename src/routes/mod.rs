pub mod api;
pub mod ws;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::handlers::not_found;
use crate::AppState;

/// Assemble the full application router
pub fn create_app_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api::create_api_routes())
        .nest("/ws", ws::create_ws_routes())
        .fallback(not_found)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
