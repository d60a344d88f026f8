/*!
 * Check middleware
 *
 * Responsibility:
 * - Run ordered authorization units (SharingCheck, EnvironmentCheck) before a handler
 * - Intercept CheckFailure from units or the handler and shape it per the caller's Accept header
 *
 * Public API:
 * - apply(router, state, capability)
 * - CheckFailure / CheckError / FailureKind
 * - CheckLogger / TracingLogger
 */
mod environment;
mod failure;
mod negotiate;
mod pipeline;
mod responder;
mod sharing;
mod unit;

pub use environment::EnvironmentCheck;
pub use failure::{CheckError, CheckFailure, FailureKind};
pub use negotiate::NegotiatedFormat;
pub use pipeline::{Pipeline, PipelineState, apply};
pub use responder::{CheckLogger, Rejection, Responder, TracingLogger};
#[cfg(test)]
pub(crate) use responder::interpolate;
pub use sharing::SharingCheck;
pub use unit::{CheckRequest, CheckUnit};
