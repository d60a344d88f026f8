//! Read access to process-wide switches the checks depend on.
//!
//! Checks never read `Config` directly; they get a `SharingSettings` handle
//! through `AppState`, so tests can flip the switch per request.

/// Administrative sharing switches.
pub trait SharingSettings: Send + Sync {
    /// `shareapi_allow_links`: whether public link shares may be used at all.
    fn links_enabled(&self) -> bool;
}

/// Settings fixed at startup from `Config`.
#[derive(Debug, Clone, Copy)]
pub struct StaticSettings {
    links_enabled: bool,
}

impl StaticSettings {
    pub fn new(links_enabled: bool) -> Self {
        Self { links_enabled }
    }
}

impl SharingSettings for StaticSettings {
    fn links_enabled(&self) -> bool {
        self.links_enabled
    }
}
