use std::{
    env,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use connect4::{Game, GameError, GameView, MoveOutcome};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "web/dist";

/// The single game shared by every request. A move holds the lock from the
/// drop until the status is computed.
type SharedGame = Arc<Mutex<Game>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let addr = env::var("CONNECT4_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let static_dir =
        env::var("CONNECT4_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
    let app = app_router(SharedGame::default(), &static_dir);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn app_router(game: SharedGame, static_dir: &str) -> Router {
    let api = Router::new()
        .route("/game", get(handle_view))
        .route("/game/new", post(handle_new))
        .route("/game/play/:column", post(handle_play))
        .with_state(game);
    let spa = Router::new().nest_service(
        "/",
        ServeDir::new(static_dir).append_index_html_on_directories(true),
    );
    Router::new()
        .nest("/api", api)
        .merge(spa)
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(axum::http::HeaderValue::from_static("*"))
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayResponse {
    #[serde(rename = "move")]
    outcome: MoveOutcome,
    game: GameView,
}

const NO_STORE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store")];

async fn handle_view(State(game): State<SharedGame>) -> Result<impl IntoResponse, ApiError> {
    let view = lock(&game)?.view()?;
    Ok((NO_STORE, Json(view)))
}

async fn handle_new(State(game): State<SharedGame>) -> Result<impl IntoResponse, ApiError> {
    let mut game = lock(&game)?;
    game.reset();
    info!("new game");
    Ok((NO_STORE, Json(game.view()?)))
}

async fn handle_play(
    State(game): State<SharedGame>,
    Path(column): Path<usize>,
) -> Result<impl IntoResponse, ApiError> {
    let mut game = lock(&game)?;
    let outcome = game.play(column)?;
    if outcome.status.is_terminal() {
        info!(status = ?outcome.status, "game over");
    }
    let view = game.view()?;
    Ok((NO_STORE, Json(PlayResponse { outcome, game: view })))
}

fn lock(game: &SharedGame) -> anyhow::Result<MutexGuard<'_, Game>> {
    game.lock().map_err(|_| anyhow!("game state lock poisoned"))
}

#[derive(Debug)]
struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<GameError>() {
            Some(GameError::ColumnFull { .. } | GameError::GameOver) => StatusCode::CONFLICT,
            Some(_) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = format!("{}", self.0);
        (status, body).into_response()
    }
}
