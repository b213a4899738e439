//! Progress reporting for long-running steps.
//!
//! Each step is logged when it starts and when it finishes (or fails), inside
//! a span named after the step so nested steps and integration logs line up
//! underneath it.

use std::future::Future;
use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};

/// Run `work`, logging its start, completion and failure.
pub async fn activity<T, E, F>(description: &str, work: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let span = info_span!("activity", step = description);
    async {
        info!("⏳ {description}");
        let started = Instant::now();
        match work.await {
            Ok(value) => {
                info!(elapsed_ms = started.elapsed().as_millis() as u64, "✅ {description}");
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "❌ Error: {description}");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
