//! Request pipeline - Requests, handlers and the behaviors wrapped around them
//!
//! Every command and query flows through the same chain:
//! validation, then logging, then the registered handler.

mod logging;
mod mediator;
mod validation;

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::application::error::{AppError, AppResult};

pub use logging::LoggingBehavior;
pub use mediator::{HandlerRegistry, HandlerRegistryBuilder, Mediator};
pub use validation::{FieldRules, ValidationBehavior, Validator};

/// A command or query
pub trait Request: fmt::Debug + Send + Sync + 'static {
    type Response: fmt::Debug + Send + 'static;

    /// Name used in logs
    const NAME: &'static str;
}

/// Implement `Request` for a command or query type
macro_rules! request {
    ($request:ident => $response:ty) => {
        impl $crate::application::pipeline::Request for $request {
            type Response = $response;

            const NAME: &'static str = stringify!($request);
        }
    };
}

pub(crate) use request;

/// Handles exactly one request type
#[async_trait]
pub trait RequestHandler: Send + Sync {
    type Request: Request;

    async fn handle(
        &self,
        request: &Self::Request,
        cancel: &CancellationToken,
    ) -> AppResult<<Self::Request as Request>::Response>;
}

/// The rest of the chain, ending in the handler
pub type Next<'a, T> = BoxFuture<'a, AppResult<T>>;

/// Cross-cutting step around a handler
///
/// A behavior short-circuits by returning without awaiting `next`.
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync {
    async fn handle(&self, request: &R, next: Next<'_, R::Response>) -> AppResult<R::Response>;
}

/// Chain `behaviors` in order in front of `handler`
pub(crate) fn run_pipeline<'a, R: Request>(
    behaviors: &'a [&'a dyn PipelineBehavior<R>],
    request: &'a R,
    handler: &'a dyn RequestHandler<Request = R>,
    cancel: &'a CancellationToken,
) -> Next<'a, R::Response> {
    match behaviors.split_first() {
        Some((behavior, rest)) => {
            behavior.handle(request, run_pipeline(rest, request, handler, cancel))
        }
        None => handler.handle(request, cancel),
    }
}

/// Race `future` against `cancel`, dropping the future if the token fires first
pub async fn cancellable<T, E, F>(cancel: &CancellationToken, future: F) -> AppResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = future => result.map_err(Into::into),
    }
}
