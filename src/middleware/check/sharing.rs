//! Public link sharing switch.

use std::sync::Arc;

use async_trait::async_trait;

use super::failure::{CheckError, CheckFailure};
use super::unit::{CheckRequest, CheckUnit};
use crate::services::settings::SharingSettings;

/// Rejects share-token requests while link sharing is administratively off.
///
/// Runs before any token lookup. Requests without a token are not a sharing
/// flow and pass through untouched.
pub struct SharingCheck {
    settings: Arc<dyn SharingSettings>,
}

impl SharingCheck {
    pub fn new(settings: Arc<dyn SharingSettings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl CheckUnit for SharingCheck {
    fn name(&self) -> &'static str {
        "sharing"
    }

    async fn apply(&self, request: &CheckRequest) -> Result<(), CheckError> {
        if request.credentials().is_share() && !self.settings.links_enabled() {
            return Err(CheckFailure::forbidden("Public link sharing is disabled").into());
        }
        Ok(())
    }
}
