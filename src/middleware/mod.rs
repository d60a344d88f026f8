/*
 * Responsibility
 * - middleware の公開インターフェース
 * - check: 認可パイプライン (route group 単位)
 * - cors / http / security_headers: Router 全体に掛ける横断的関心事
 */
pub mod check;
pub mod cors;
pub mod http;
pub mod security_headers;
