//! Logging behavior - Request entry, timing and outcome

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};

use super::{Next, PipelineBehavior, Request};
use crate::application::error::AppResult;

/// Logs each request inside a `request` span
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl<R: Request> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(&self, request: &R, next: Next<'_, R::Response>) -> AppResult<R::Response> {
        let span = info_span!("request", name = R::NAME);

        async move {
            info!(?request, "Handling {}", R::NAME);
            let started = Instant::now();

            let result = next.await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    info!(elapsed_ms, "Handled {}", R::NAME);
                    debug!(?response, "Response for {}", R::NAME);
                }
                Err(e) => {
                    warn!(elapsed_ms, kind = e.kind(), error = %e, "{} failed", R::NAME);
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}
