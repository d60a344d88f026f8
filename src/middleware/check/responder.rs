//! Turns a `CheckFailure` into exactly one outward response.
//!
//! - API callers: `{"message", "success": false}` with the failure status.
//! - Browsers, 401: the guest `authenticate` page, rendered inline. A redirect
//!   would send the unauthenticated browser straight back into the failing
//!   route. Only GET requests get a form that replays the request.
//! - Browsers, anything else: 303 to the error page with `message` and `code`.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::Level;

use super::failure::{CheckFailure, FailureKind, structured_response};
use super::negotiate::NegotiatedFormat;
use crate::services::urls::{Route, UrlGenerator};
use crate::views::{self, Layout, Page, Template};

/// Logging sink: `(level, message template, context map)`.
///
/// Templates use `{key}` placeholders filled from the context.
pub trait CheckLogger: Send + Sync {
    fn log(&self, level: Level, template: &'static str, context: &[(&'static str, String)]);
}

/// Forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CheckLogger for TracingLogger {
    fn log(&self, level: Level, template: &'static str, context: &[(&'static str, String)]) {
        let message = interpolate(template, context);
        let context = context
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        // tracing needs the level at compile time
        if level == Level::ERROR {
            tracing::error!(target: "check", %context, "{}", message);
        } else if level == Level::WARN {
            tracing::warn!(target: "check", %context, "{}", message);
        } else if level == Level::INFO {
            tracing::info!(target: "check", %context, "{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!(target: "check", %context, "{}", message);
        } else {
            tracing::trace!(target: "check", %context, "{}", message);
        }
    }
}

pub(crate) fn interpolate(template: &str, context: &[(&'static str, String)]) -> String {
    context.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// The single response produced for a failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    StructuredError {
        status: StatusCode,
        message: String,
    },
    RedirectTo {
        url: String,
    },
    RenderedForm {
        template: Template,
        params: Vec<(String, String)>,
        layout: Layout,
        message: String,
        resubmit: bool,
    },
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::StructuredError { status, message } => {
                structured_response(status, &message)
            }
            Rejection::RedirectTo { url } => Redirect::to(&url).into_response(),
            Rejection::RenderedForm {
                template,
                params,
                layout,
                message,
                resubmit,
            } => {
                let page = Page {
                    message: &message,
                    code: StatusCode::UNAUTHORIZED.as_u16(),
                    params: &params,
                    resubmit,
                };
                (
                    StatusCode::UNAUTHORIZED,
                    Html(views::render(template, layout, &page)),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Clone)]
pub struct Responder {
    app_name: Arc<str>,
    urls: UrlGenerator,
    logger: Arc<dyn CheckLogger>,
}

impl Responder {
    pub fn new(app_name: Arc<str>, urls: UrlGenerator, logger: Arc<dyn CheckLogger>) -> Self {
        Self {
            app_name,
            urls,
            logger,
        }
    }

    /// `resubmit` tells whether the failed request can be replayed from a GET
    /// form.
    pub fn respond(
        &self,
        format: NegotiatedFormat,
        params: &[(String, String)],
        resubmit: bool,
        failure: &CheckFailure,
    ) -> Rejection {
        let app = self.app_name.to_string();
        let message = failure.message().to_string();
        let code = failure.code().to_string();

        self.logger.log(
            Level::DEBUG,
            "[CheckFailure] {message} ({code})",
            &[
                ("app", app.clone()),
                ("message", message.clone()),
                ("code", code.clone()),
            ],
        );

        match format {
            NegotiatedFormat::PrefersStructured => {
                self.logger
                    .log(Level::DEBUG, "[CheckFailure] JSON response", &[("app", app)]);

                Rejection::StructuredError {
                    status: failure.kind().status(),
                    message,
                }
            }
            NegotiatedFormat::PrefersDocument if failure.kind() == FailureKind::Unauthorized => {
                // Parameter names only: values may hold the token or a password.
                let names = params
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                let (template, layout) = (Template::Authenticate, Layout::Guest);
                self.logger.log(
                    Level::DEBUG,
                    "[CheckFailure] HTML response, rendering {template} ({layout}) for params: {params}",
                    &[
                        ("app", app),
                        ("template", template.name().to_string()),
                        ("layout", layout.name().to_string()),
                        ("params", names),
                    ],
                );

                Rejection::RenderedForm {
                    template,
                    params: params.to_vec(),
                    layout,
                    message,
                    resubmit,
                }
            }
            NegotiatedFormat::PrefersDocument => {
                let url = self.urls.link_to_route(
                    Route::ErrorPage,
                    &[("message", message.as_str()), ("code", code.as_str())],
                );
                self.logger.log(
                    Level::DEBUG,
                    "[CheckFailure] HTML response, redirecting to {route}",
                    &[("app", app), ("route", self.urls.route_name(Route::ErrorPage))],
                );

                Rejection::RedirectTo { url }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingLogger;
    use axum::http::header;

    fn responder(logger: Arc<RecordingLogger>) -> Responder {
        Responder::new(
            Arc::from("galleryplus"),
            UrlGenerator::new("galleryplus", ""),
            logger,
        )
    }

    fn params() -> Vec<(String, String)> {
        vec![
            ("token".to_string(), "abc123".to_string()),
            ("dir".to_string(), "/photos".to_string()),
        ]
    }

    #[test]
    fn structured_caller_gets_status_and_message() {
        let logger = Arc::new(RecordingLogger::default());
        let rejection = responder(logger).respond(
            NegotiatedFormat::PrefersStructured,
            &params(),
            true,
            &CheckFailure::not_found("Link not found"),
        );

        assert_eq!(
            rejection,
            Rejection::StructuredError {
                status: StatusCode::NOT_FOUND,
                message: "Link not found".into()
            }
        );
    }

    #[test]
    fn browser_unauthorized_gets_inline_form_with_params() {
        let logger = Arc::new(RecordingLogger::default());
        let rejection = responder(logger).respond(
            NegotiatedFormat::PrefersDocument,
            &params(),
            true,
            &CheckFailure::unauthorized("Missing password"),
        );

        assert_eq!(
            rejection,
            Rejection::RenderedForm {
                template: Template::Authenticate,
                params: params(),
                layout: Layout::Guest,
                message: "Missing password".into(),
                resubmit: true,
            }
        );
    }

    #[test]
    fn browser_forbidden_and_not_found_redirect_to_error_page() {
        let logger = Arc::new(RecordingLogger::default());
        let responder = responder(logger);

        for failure in [
            CheckFailure::forbidden("Sharing is disabled"),
            CheckFailure::not_found("Link not found"),
        ] {
            let rejection =
                responder.respond(NegotiatedFormat::PrefersDocument, &params(), true, &failure);
            let url = match rejection {
                Rejection::RedirectTo { url } => url,
                other => panic!("expected redirect, got {:?}", other),
            };

            let parsed = url::Url::parse(&format!("http://localhost{}", url)).unwrap();
            assert_eq!(parsed.path(), "/error_page");
            let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
            assert_eq!(
                query,
                vec![
                    ("message".to_string(), failure.message().to_string()),
                    ("code".to_string(), failure.code().to_string()),
                ]
            );
        }
    }

    #[test]
    fn failure_is_logged_before_shaping() {
        let logger = Arc::new(RecordingLogger::default());
        responder(logger.clone()).respond(
            NegotiatedFormat::PrefersStructured,
            &[],
            true,
            &CheckFailure::forbidden("nope"),
        );

        let entries = logger.entries();
        assert_eq!(entries[0].level, Level::DEBUG);
        assert_eq!(entries[0].template, "[CheckFailure] {message} ({code})");
        assert_eq!(entries[0].rendered, "[CheckFailure] nope (403)");
    }

    #[test]
    fn unauthorized_log_never_contains_param_values() {
        let logger = Arc::new(RecordingLogger::default());
        responder(logger.clone()).respond(
            NegotiatedFormat::PrefersDocument,
            &[("password".to_string(), "hunter2".to_string())],
            true,
            &CheckFailure::unauthorized("Wrong password"),
        );

        assert!(logger.entries().iter().all(|e| !e.rendered.contains("hunter2")));
    }

    #[test]
    fn rejection_responses_have_expected_shape() {
        let redirect = Rejection::RedirectTo {
            url: "/error_page?message=x&code=403".into(),
        }
        .into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            redirect.headers().get(header::LOCATION).unwrap(),
            "/error_page?message=x&code=403"
        );

        let form = Rejection::RenderedForm {
            template: Template::Authenticate,
            params: params(),
            layout: Layout::Guest,
            message: "Missing password".into(),
            resubmit: true,
        }
        .into_response();
        assert_eq!(form.status(), StatusCode::UNAUTHORIZED);
        assert!(form.extensions().get::<CheckFailure>().is_none());
    }

    #[test]
    fn interpolate_fills_placeholders() {
        assert_eq!(
            interpolate(
                "{message} ({code})",
                &[("message", "gone".into()), ("code", "404".into())]
            ),
            "gone (404)"
        );
    }
}
