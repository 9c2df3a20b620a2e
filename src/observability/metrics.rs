//! Metrics collection for `autofisher`.
//!
//! Prometheus-compatible counters and gauges for the automation core.
//! Every label comes from a closed enum, so cardinality is bounded by
//! construction.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::engine::{CritSignal, MinigamePhase};
use crate::error::AutofisherError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// How a reel attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelResult {
    /// The engine accepted the reel.
    Committed,
    /// The player was not in a fishing state.
    Skipped,
    /// The engine raised a fault.
    Failed,
    /// The phase or session moved on before the delay elapsed.
    Stale,
}

impl ReelResult {
    const fn label(self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Stale => "stale",
        }
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`.  When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns `AutofisherError::Io` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), AutofisherError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| AutofisherError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "autofisher_subscriptions_total",
        "Times the controller hooks were registered"
    );
    describe_gauge!(
        "autofisher_subscribed",
        "Whether controller hooks are currently registered (1 = yes)"
    );
    describe_counter!("autofisher_bites_total", "Bites detected and hooked");
    describe_counter!("autofisher_crits_total", "Crit windows observed by kind");
    describe_counter!("autofisher_reels_total", "Reel attempts by result");
    describe_counter!(
        "autofisher_outcomes_total",
        "Finished minigame rounds by outcome"
    );
}

/// Records a successful hook registration.
pub fn record_subscribed() {
    counter!("autofisher_subscriptions_total").increment(1);
    gauge!("autofisher_subscribed").set(1.0);
}

/// Records the release of the hook registration.
pub fn record_unsubscribed() {
    gauge!("autofisher_subscribed").set(0.0);
}

/// Records a hooked bite.
pub fn record_bite() {
    counter!("autofisher_bites_total").increment(1);
}

/// Records a crit window seen during the active phase.
pub fn record_crit(signal: CritSignal) {
    counter!("autofisher_crits_total", "kind" => signal.label()).increment(1);
}

/// Records the result of a scheduled reel.
pub fn record_reel(result: ReelResult) {
    counter!("autofisher_reels_total", "result" => result.label()).increment(1);
}

/// Records a finished round. Non-outcome phases are ignored.
pub fn record_outcome(phase: MinigamePhase) {
    if phase.is_outcome() {
        counter!("autofisher_outcomes_total", "outcome" => phase.label()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reel_result_labels_are_distinct() {
        let labels = [
            ReelResult::Committed.label(),
            ReelResult::Skipped.label(),
            ReelResult::Failed.label(),
            ReelResult::Stale.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        // metrics macros silently no-op when no global recorder is installed
        record_subscribed();
        record_unsubscribed();
        record_bite();
        record_crit(CritSignal::Good);
        record_reel(ReelResult::Committed);
        record_outcome(MinigamePhase::Win);
        record_outcome(MinigamePhase::Active);
    }
}
