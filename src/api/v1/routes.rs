/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route group ごとに必要な capability を宣言し、check pipeline を route_layer で掛ける
 */
use axum::{
    Router,
    routing::{delete, get},
};

use crate::api::v1::handlers::{
    files::{delete_file, list_files, preview_file},
    health::health,
};
use crate::middleware::check;
use crate::services::environment::Capability;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let read = Router::new()
        .route("/files/list", get(list_files))
        .route("/files/preview", get(preview_file));
    let read = check::apply(read, state.clone(), Capability::Read);

    let write = Router::new().route("/files", delete(delete_file));
    let write = check::apply(write, state, Capability::Delete);

    Router::new()
        .route("/health", get(health))
        .merge(read)
        .merge(write)
}
