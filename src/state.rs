/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - settings / resolver / url generator / check logger
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - request 間で共有するのは read-only なものだけ。AccessContext は request ごと
 */
use std::sync::Arc;

use crate::middleware::check::CheckLogger;
use crate::services::{
    environment::EnvironmentResolver, settings::SharingSettings, urls::UrlGenerator,
};

#[derive(Clone)]
pub struct AppState {
    pub app_name: Arc<str>,
    pub settings: Arc<dyn SharingSettings>,
    pub resolver: Arc<EnvironmentResolver>,
    pub urls: UrlGenerator,
    pub logger: Arc<dyn CheckLogger>,
}

impl AppState {
    pub fn new(
        app_name: impl Into<Arc<str>>,
        settings: Arc<dyn SharingSettings>,
        resolver: Arc<EnvironmentResolver>,
        urls: UrlGenerator,
        logger: Arc<dyn CheckLogger>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            settings,
            resolver,
            urls,
            logger,
        }
    }
}
