//! Credentials -> AccessContext.
//!
//! Read-only: the resolver never mutates share or session state. Store
//! failures come back as `CheckError::Internal` and are not shaped by the
//! check responder.

use std::sync::Arc;

use chrono::Utc;

use super::lookup::{ShareLookup, UserLookup};
use super::password;
use super::path::ResourcePath;
use super::types::{AccessContext, AccessScope, CapabilitySet, Credentials};
use crate::middleware::check::{CheckError, CheckFailure};
use crate::services::session::SessionVerifier;

pub struct EnvironmentResolver {
    shares: Arc<dyn ShareLookup>,
    users: Arc<dyn UserLookup>,
    sessions: Arc<SessionVerifier>,
}

impl EnvironmentResolver {
    pub fn new(
        shares: Arc<dyn ShareLookup>,
        users: Arc<dyn UserLookup>,
        sessions: Arc<SessionVerifier>,
    ) -> Self {
        Self {
            shares,
            users,
            sessions,
        }
    }

    /// `target` is an owner-absolute path; `None` means the context root.
    pub async fn resolve(
        &self,
        credentials: &Credentials,
        target: Option<&str>,
    ) -> Result<AccessContext, CheckError> {
        match credentials {
            Credentials::Share { token, password } => {
                self.resolve_share(token, password.as_deref(), target).await
            }
            Credentials::Session { bearer } => self.resolve_session(bearer, target).await,
            Credentials::Anonymous => {
                Err(CheckFailure::unauthorized("Authentication required").into())
            }
        }
    }

    async fn resolve_share(
        &self,
        token: &str,
        password: Option<&str>,
        target: Option<&str>,
    ) -> Result<AccessContext, CheckError> {
        let share = self
            .shares
            .find_by_token(token)
            .await?
            .ok_or_else(|| CheckFailure::not_found("Link not found"))?;

        if share.is_expired(Utc::now()) {
            return Err(CheckFailure::not_found("Link has expired").into());
        }

        if !self.users.user_exists(share.owner).await? {
            tracing::debug!(share_id = share.id, "share owner no longer exists");
            return Err(CheckFailure::not_found("Link not found").into());
        }

        let root = ResourcePath::parse(&share.path).map_err(|err| {
            tracing::warn!(share_id = share.id, error = %err, "share points at an invalid path");
            CheckFailure::not_found("Link item is not valid").with_cause(err)
        })?;

        if let Some(hash) = share.password_hash.as_deref() {
            match password {
                None => return Err(CheckFailure::unauthorized("Missing password").into()),
                Some(candidate) => {
                    if !password::verify(hash, candidate).await {
                        return Err(CheckFailure::unauthorized("Wrong password").into());
                    }
                }
            }
        }

        let target = target_path(target, &root)?;
        if !target.starts_with(&root) {
            return Err(CheckFailure::forbidden("Path is outside of the shared folder").into());
        }

        tracing::debug!(share_id = share.id, root = %root, target = %target, "share context resolved");

        Ok(AccessContext {
            owner: share.owner,
            root,
            target,
            scope: AccessScope::Share { share_id: share.id },
            capabilities: CapabilitySet::read_only(),
        })
    }

    async fn resolve_session(
        &self,
        bearer: &str,
        target: Option<&str>,
    ) -> Result<AccessContext, CheckError> {
        let user_id = match self.sessions.verify(bearer) {
            Ok(user_id) => user_id,
            Err(err) => {
                tracing::warn!(error = ?err, "session verification failed");
                return Err(CheckFailure::unauthorized("Session expired")
                    .with_cause(err)
                    .into());
            }
        };

        if !self.users.user_exists(user_id).await? {
            return Err(CheckFailure::unauthorized("Unknown account").into());
        }

        let root = ResourcePath::root();
        let target = target_path(target, &root)?;

        tracing::debug!(user_id = %user_id, target = %target, "account context resolved");

        Ok(AccessContext {
            owner: user_id,
            root,
            target,
            scope: AccessScope::Account,
            capabilities: CapabilitySet::full(),
        })
    }
}

fn target_path(raw: Option<&str>, root: &ResourcePath) -> Result<ResourcePath, CheckFailure> {
    match raw {
        Some(raw) => {
            ResourcePath::parse(raw).map_err(|err| CheckFailure::forbidden("Invalid path").with_cause(err))
        }
        None => Ok(root.clone()),
    }
}
