/*
 * Responsibility
 * - v1 の公開ポイント (routes() の re-export など)
 */
mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
