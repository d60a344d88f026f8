/*
 * Responsibility
 * - GET /error_page?message=..&code=.. (check responder の redirect 先)
 * - guest layout で描画 (認証済み前提の chrome に依存しない)
 */
use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::views::{self, Layout, Page, Template};

#[derive(Debug, Deserialize)]
pub struct ErrorPageQuery {
    #[serde(default)]
    pub message: String,
    pub code: Option<u16>,
}

pub async fn error_page(Query(query): Query<ErrorPageQuery>) -> Result<Response, AppError> {
    let status = match query.code {
        Some(code) => StatusCode::from_u16(code)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .ok_or_else(|| AppError::bad_request("INVALID_ERROR_CODE", "invalid error code"))?,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let page = Page {
        message: &query.message,
        code: status.as_u16(),
        params: &[],
        resubmit: false,
    };

    Ok((
        status,
        Html(views::render(Template::ErrorPage, Layout::Guest, &page)),
    )
        .into_response())
}
