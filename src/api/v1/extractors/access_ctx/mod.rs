/*!
 * Access context extractor
 *
 * Responsibility:
 * - check pipeline が解決した AccessContext を handler に渡す
 * - 型定義は services::environment 側、axum 依存は core に閉じ込める
 */

mod core;

pub use core::AccessCtx;
