use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::middleware::check::CheckFailure;
use crate::services::environment::AccessContext;

/// Handler で AccessContext を受け取るための extractor。
/// check pipeline が request extensions に insert 済みである前提。
/// 見つからない場合 (pipeline 未設定の route) は 401。
pub struct AccessCtx(pub AccessContext);

impl<S> FromRequestParts<S> for AccessCtx
where
    S: Send + Sync,
{
    type Rejection = CheckFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessContext>()
            .cloned()
            .map(AccessCtx)
            .ok_or_else(|| CheckFailure::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::environment::{AccessScope, CapabilitySet, ResourcePath};
    use axum::http::Request;
    use uuid::Uuid;

    #[tokio::test]
    async fn missing_context_is_unauthorized() {
        let (mut parts, _) = Request::get("/").body(()).unwrap().into_parts();
        let rejection = AccessCtx::from_request_parts(&mut parts, &()).await.err().unwrap();

        assert_eq!(rejection.code(), 401);
    }

    #[tokio::test]
    async fn context_from_extensions_is_returned() {
        let ctx = AccessContext {
            owner: Uuid::new_v4(),
            root: ResourcePath::root(),
            target: ResourcePath::root(),
            scope: AccessScope::Account,
            capabilities: CapabilitySet::full(),
        };
        let (mut parts, _) = Request::get("/").body(()).unwrap().into_parts();
        parts.extensions.insert(ctx.clone());

        let AccessCtx(found) = AccessCtx::from_request_parts(&mut parts, &()).await.ok().unwrap();
        assert_eq!(found, ctx);
    }
}
