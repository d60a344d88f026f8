//! Builds links to named application routes.

use std::sync::Arc;

use url::form_urlencoded;

/// Routes that other components link to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ErrorPage,
}

impl Route {
    fn local_name(&self) -> &'static str {
        match self {
            Route::ErrorPage => "page.error_page",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            Route::ErrorPage => "/error_page",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlGenerator {
    app_name: Arc<str>,
    base_path: Arc<str>,
}

impl UrlGenerator {
    pub fn new(app_name: impl Into<Arc<str>>, base_path: impl Into<Arc<str>>) -> Self {
        Self {
            app_name: app_name.into(),
            base_path: base_path.into(),
        }
    }

    /// Fully qualified route name, e.g. `galleryplus.page.error_page`.
    pub fn route_name(&self, route: Route) -> String {
        format!("{}.{}", self.app_name, route.local_name())
    }

    pub fn link_to_route(&self, route: Route, params: &[(&str, &str)]) -> String {
        let mut link = format!("{}{}", self.base_path, route.path());
        if !params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter().copied())
                .finish();
            link.push('?');
            link.push_str(&query);
        }
        link
    }
}
