use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::middleware::auth::session_auth_middleware;
use crate::store::NoteStore;

/// Process-wide shared state: the store handle, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected API
        .merge(user_routes())
        .merge(category_routes())
        .merge(note_routes())
        // Unknown routes get the uniform error envelope
        .fallback(unknown_route)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use crate::handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    use crate::handlers::users;

    Router::new()
        .route(
            "/api/users",
            get(users::get_user).patch(users::update_username),
        )
        .route_layer(middleware::from_fn(session_auth_middleware))
}

fn category_routes() -> Router<AppState> {
    use crate::handlers::categories;

    Router::new()
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:category_id",
            patch(categories::update_label).delete(categories::remove),
        )
        .route_layer(middleware::from_fn(session_auth_middleware))
}

fn note_routes() -> Router<AppState> {
    use crate::handlers::notes;

    Router::new()
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/:note_id",
            get(notes::get_note).delete(notes::remove),
        )
        .route(
            "/api/notes/:note_id/:field_to_update",
            patch(notes::update_field),
        )
        .route_layer(middleware::from_fn(session_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Notekeeper API",
            "version": version,
            "description": "Note-taking backend with ownership-scoped categories and notes",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/register, /api/auth/login, /api/auth/logout (public)",
                "users": "/api/users (protected)",
                "categories": "/api/categories[/:categoryId] (protected)",
                "notes": "/api/notes[/:noteId[/:fieldToUpdate]] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}

/// Router fallback naming the method and path that missed.
async fn unknown_route(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!(
        "This route {} {} doesn't exist",
        method,
        uri.path()
    ))
}
