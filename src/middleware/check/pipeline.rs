//! Ordered check units in front of a route group.
//!
//! `Pending -> Running(i) -> Passed | Failed(failure)`. The first failure
//! stops the run; later units and the handler never execute. A failure the
//! handler itself returns is caught after the handler and shaped the same
//! way. Non-check errors are not intercepted.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use super::environment::EnvironmentCheck;
use super::failure::{CheckError, CheckFailure};
use super::negotiate::NegotiatedFormat;
use super::responder::Responder;
use super::sharing::SharingCheck;
use super::unit::{CheckRequest, CheckUnit};
use crate::error::AppError;
use crate::services::environment::Capability;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Pending,
    Running(usize),
    Passed,
    Failed(CheckFailure),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Passed | PipelineState::Failed(_))
    }
}

#[derive(Default)]
pub struct Pipeline {
    units: Vec<Box<dyn CheckUnit>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units run in the order they are registered.
    pub fn register(mut self, unit: impl CheckUnit + 'static) -> Self {
        self.units.push(Box::new(unit));
        self
    }

    /// The gate every checked route uses: cheap sharing switch first, then
    /// the environment resolution.
    pub fn for_route(state: &AppState, required: Capability) -> Self {
        Self::new()
            .register(SharingCheck::new(state.settings.clone()))
            .register(EnvironmentCheck::new(state.resolver.clone(), required))
    }

    /// Returns a terminal state, or the first non-check error.
    pub async fn run(&self, request: &CheckRequest) -> Result<PipelineState, AppError> {
        let mut state = PipelineState::Pending;

        for (index, unit) in self.units.iter().enumerate() {
            state = PipelineState::Running(index);
            tracing::trace!(unit = unit.name(), ?state, "running check");

            match unit.apply(request).await {
                Ok(()) => {}
                Err(CheckError::Failure(failure)) => {
                    tracing::debug!(unit = unit.name(), code = failure.code(), "check failed");
                    state = PipelineState::Failed(failure);
                    break;
                }
                Err(CheckError::Internal(err)) => return Err(err),
            }
        }

        if !state.is_terminal() {
            state = PipelineState::Passed;
        }
        Ok(state)
    }
}

#[derive(Clone)]
struct CheckGate {
    app: AppState,
    required: Capability,
}

/// Put the check pipeline in front of every route of `router`.
///
/// Example:
/// ```ignore
/// let read = Router::new().route("/files/list", get(list_files));
/// let read = middleware::check::apply(read, state.clone(), Capability::Read);
/// ```
pub fn apply(router: Router<AppState>, state: AppState, required: Capability) -> Router<AppState> {
    let gate = CheckGate {
        app: state,
        required,
    };
    router.route_layer(middleware::from_fn_with_state(gate, check_middleware))
}

async fn check_middleware(
    State(gate): State<CheckGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let format = NegotiatedFormat::from_headers(&parts.headers);
    let responder = Responder::new(
        gate.app.app_name.clone(),
        gate.app.urls.clone(),
        gate.app.logger.clone(),
    );
    let request = CheckRequest::from_parts(&parts);
    let resubmit = parts.method == Method::GET;
    let pipeline = Pipeline::for_route(&gate.app, gate.required);

    if let PipelineState::Failed(failure) = pipeline.run(&request).await? {
        return Ok(responder
            .respond(format, request.params(), resubmit, &failure)
            .into_response());
    }

    let params = request.params().to_vec();
    if let Some(ctx) = request.into_context() {
        // middleware -> extractor
        parts.extensions.insert(ctx);
    }

    let response = next.run(Request::from_parts(parts, body)).await;

    let raised = response.extensions().get::<CheckFailure>().cloned();
    match raised {
        Some(failure) => Ok(responder.respond(format, &params, resubmit, &failure).into_response()),
        None => Ok(response),
    }
}
