/*
 * Responsibility
 * - files 系 handler のレスポンス DTO
 */
use serde::Serialize;
use uuid::Uuid;

use crate::services::environment::{AccessContext, AccessScope, Capability};

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Account,
    Share,
}

/// What the caller may see: the resolved scope of the request.
#[derive(Debug, Serialize)]
pub struct FileScopeResponse {
    pub owner: Uuid,
    pub root: String,
    pub path: String,
    pub scope: ScopeKind,
    pub capabilities: Vec<Capability>,
}

impl From<&AccessContext> for FileScopeResponse {
    fn from(ctx: &AccessContext) -> Self {
        Self {
            owner: ctx.owner,
            root: ctx.root.to_string(),
            path: ctx.target.to_string(),
            scope: match ctx.scope {
                AccessScope::Account => ScopeKind::Account,
                AccessScope::Share { .. } => ScopeKind::Share,
            },
            capabilities: ctx.capabilities.to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub path: String,
    pub owner: Uuid,
}
