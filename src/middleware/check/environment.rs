//! Resolves the AccessContext and gates the route's required capability.

use std::sync::Arc;

use async_trait::async_trait;

use super::failure::{CheckError, CheckFailure};
use super::unit::{CheckRequest, CheckUnit};
use crate::services::environment::{Capability, EnvironmentResolver};

pub struct EnvironmentCheck {
    resolver: Arc<EnvironmentResolver>,
    required: Capability,
}

impl EnvironmentCheck {
    pub fn new(resolver: Arc<EnvironmentResolver>, required: Capability) -> Self {
        Self { resolver, required }
    }
}

#[async_trait]
impl CheckUnit for EnvironmentCheck {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn apply(&self, request: &CheckRequest) -> Result<(), CheckError> {
        let ctx = request.access_context(&self.resolver).await?;

        if !ctx.capabilities.contains(self.required) {
            tracing::debug!(
                required = %self.required,
                share = ctx.is_share(),
                "capability missing"
            );
            return Err(CheckFailure::forbidden(format!(
                "This link does not allow the {} operation",
                self.required
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::check::FailureKind;
    use crate::testing::{MemoryDirectory, session_token, share, verifier};
    use uuid::Uuid;

    fn setup() -> (Arc<EnvironmentResolver>, Uuid) {
        let owner = Uuid::new_v4();
        let directory = Arc::new(
            MemoryDirectory::default()
                .with_user(owner)
                .with_share(share(1, "tok", owner, "/photos")),
        );
        let resolver =
            EnvironmentResolver::new(directory.clone(), directory, Arc::new(verifier()));
        (Arc::new(resolver), owner)
    }

    fn kind(result: Result<(), CheckError>) -> Option<FailureKind> {
        match result {
            Ok(()) => None,
            Err(CheckError::Failure(f)) => Some(f.kind()),
            Err(other) => panic!("unexpected internal error {:?}", other),
        }
    }

    #[tokio::test]
    async fn share_passes_read_and_fails_delete() {
        let (resolver, _) = setup();
        let request = || CheckRequest::new(vec![("token".into(), "tok".into())], None);

        let read = EnvironmentCheck::new(resolver.clone(), Capability::Read);
        assert_eq!(kind(read.apply(&request()).await), None);

        let delete = EnvironmentCheck::new(resolver, Capability::Delete);
        assert_eq!(kind(delete.apply(&request()).await), Some(FailureKind::Forbidden));
    }

    #[tokio::test]
    async fn session_passes_delete() {
        let (resolver, owner) = setup();
        let request = CheckRequest::new(Vec::new(), Some(session_token(owner)));

        let delete = EnvironmentCheck::new(resolver, Capability::Delete);
        assert_eq!(kind(delete.apply(&request).await), None);
    }

    #[tokio::test]
    async fn no_credentials_is_unauthorized() {
        let (resolver, _) = setup();
        let check = EnvironmentCheck::new(resolver, Capability::Read);

        assert_eq!(
            kind(check.apply(&CheckRequest::new(Vec::new(), None)).await),
            Some(FailureKind::Unauthorized)
        );
    }
}
