//! The check unit contract and the per-request view units work on.

use async_trait::async_trait;
use axum::http::{header, request::Parts};
use tokio::sync::OnceCell;

use super::failure::CheckError;
use crate::services::environment::{AccessContext, Credentials, EnvironmentResolver};

const TOKEN_PARAM: &str = "token";
const PASSWORD_PARAM: &str = "password";
const TARGET_PARAMS: [&str; 2] = ["file", "dir"];

/// One authorization rule. Units read the request and either pass or fail;
/// they never build a response themselves.
#[async_trait]
pub trait CheckUnit: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, request: &CheckRequest) -> Result<(), CheckError>;
}

/// Request-scoped input of the pipeline.
///
/// Owns the memo for the AccessContext: the first unit that needs it resolves
/// it, later units (and the handler) reuse the same value. Dropped with the
/// request.
#[derive(Debug)]
pub struct CheckRequest {
    params: Vec<(String, String)>,
    credentials: Credentials,
    target: Option<String>,
    context: OnceCell<AccessContext>,
}

impl CheckRequest {
    pub fn from_parts(parts: &Parts) -> Self {
        let params = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self::new(params, bearer)
    }

    pub fn new(params: Vec<(String, String)>, bearer: Option<String>) -> Self {
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, v)| k == name && !v.is_empty())
                .map(|(_, v)| v.clone())
        };

        let credentials = match (param(TOKEN_PARAM), bearer) {
            (Some(token), _) => Credentials::Share {
                token,
                password: param(PASSWORD_PARAM),
            },
            (None, Some(bearer)) => Credentials::Session { bearer },
            (None, None) => Credentials::Anonymous,
        };

        let target = TARGET_PARAMS.iter().find_map(|name| param(*name));

        Self {
            params,
            credentials,
            target,
            context: OnceCell::new(),
        }
    }

    /// Query parameters exactly as received, in order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Resolve once, then serve the memoized context.
    pub async fn access_context(
        &self,
        resolver: &EnvironmentResolver,
    ) -> Result<&AccessContext, CheckError> {
        self.context
            .get_or_try_init(|| resolver.resolve(&self.credentials, self.target.as_deref()))
            .await
    }

    /// The resolved context, if any unit asked for it.
    pub fn into_context(self) -> Option<AccessContext> {
        self.context.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryDirectory, share, verifier};
    use axum::http::Request;
    use std::sync::Arc;
    use uuid::Uuid;

    fn parts(uri: &str, bearer: Option<&str>) -> Parts {
        let mut builder = Request::get(uri);
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn token_param_wins_over_session() {
        let req = CheckRequest::from_parts(&parts("/x?token=abc&password=pw", Some("jwt")));

        assert_eq!(
            req.credentials(),
            &Credentials::Share {
                token: "abc".into(),
                password: Some("pw".into())
            }
        );
    }

    #[test]
    fn bearer_without_token_is_session() {
        let req = CheckRequest::from_parts(&parts("/x", Some("jwt")));
        assert_eq!(
            req.credentials(),
            &Credentials::Session {
                bearer: "jwt".into()
            }
        );
    }

    #[test]
    fn empty_token_is_anonymous() {
        let req = CheckRequest::from_parts(&parts("/x?token=", None));
        assert_eq!(req.credentials(), &Credentials::Anonymous);
    }

    #[test]
    fn params_are_kept_in_order_and_target_prefers_file() {
        let req = CheckRequest::from_parts(&parts("/x?dir=%2Fa&file=%2Fa%2Fb.jpg&x=1", None));

        assert_eq!(
            req.params(),
            &[
                ("dir".to_string(), "/a".to_string()),
                ("file".to_string(), "/a/b.jpg".to_string()),
                ("x".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(req.target(), Some("/a/b.jpg"));
    }

    #[tokio::test]
    async fn access_context_is_resolved_once_per_request() {
        let owner = Uuid::new_v4();
        let directory = Arc::new(
            MemoryDirectory::default()
                .with_user(owner)
                .with_share(share(1, "tok", owner, "/photos")),
        );
        let resolver =
            EnvironmentResolver::new(directory.clone(), directory.clone(), Arc::new(verifier()));
        let req = CheckRequest::new(vec![("token".into(), "tok".into())], None);

        let first = req.access_context(&resolver).await.unwrap().clone();
        let second = req.access_context(&resolver).await.unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(directory.share_lookups(), 1);
        assert_eq!(req.into_context(), Some(first));
    }
}
