/*
 * Responsibility
 * - /files 系 handler
 * - 認可は check pipeline 済み。handler は AccessCtx を受け取るだけ
 * - storage / preview 生成は別サービスの責務なので、ここでは解決済みスコープを返す
 */
use axum::{Json, http::StatusCode};

use crate::{
    api::v1::{
        dto::files::{FileScopeResponse, PreviewResponse},
        extractors::AccessCtx,
    },
    middleware::check::{CheckError, CheckFailure},
};

pub async fn list_files(AccessCtx(ctx): AccessCtx) -> Json<FileScopeResponse> {
    Json(FileScopeResponse::from(&ctx))
}

pub async fn preview_file(
    AccessCtx(ctx): AccessCtx,
) -> Result<Json<PreviewResponse>, CheckError> {
    // A folder (the context root) has no preview.
    if ctx.target == ctx.root {
        return Err(CheckFailure::not_found("File not found").into());
    }

    Ok(Json(PreviewResponse {
        path: ctx.target.to_string(),
        owner: ctx.owner,
    }))
}

pub async fn delete_file(AccessCtx(ctx): AccessCtx) -> Result<StatusCode, CheckError> {
    if ctx.target == ctx.root {
        return Err(CheckFailure::forbidden("The root folder cannot be deleted").into());
    }

    tracing::info!(owner = %ctx.owner, path = %ctx.target, "delete accepted");
    Ok(StatusCode::NO_CONTENT)
}
