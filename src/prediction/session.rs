use super::{PredictionClient, PredictionOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// What a UI should show for the most recent analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PredictionState {
    Idle,
    Loading,
    #[serde(rename_all = "camelCase")]
    Settled {
        outcome: PredictionOutcome,
        settled_at: DateTime<Utc>,
    },
}

/// Holds the single result slot shared by successive analyses.
///
/// Every call to [`analyze`](Self::analyze) takes a new generation number.
/// A call only writes the slot if no newer call started while it was in
/// flight, so a late answer to a superseded request is never displayed.
pub struct PredictionSession {
    in_flight: AtomicUsize,
    generation: AtomicU64,
    slot: RwLock<PredictionState>,
}

struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PredictionSession {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            slot: RwLock::new(PredictionState::Idle),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> PredictionState {
        self.slot.read().await.clone()
    }

    /// Runs one prediction and records it in the slot.
    ///
    /// The outcome is always returned to the caller, even when a newer call
    /// has taken over the slot.
    pub async fn analyze(
        &self,
        client: &PredictionClient,
        match_url: &str,
        half_time_home: Option<u32>,
        half_time_away: Option<u32>,
    ) -> PredictionOutcome {
        let _busy = BusyGuard::acquire(&self.in_flight);

        // Generation and Loading are written under one lock
        let generation = {
            let mut slot = self.slot.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *slot = PredictionState::Loading;
            generation
        };

        let outcome = client
            .request_prediction(match_url, half_time_home, half_time_away)
            .await;

        let mut slot = self.slot.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = PredictionState::Settled {
                outcome: outcome.clone(),
                settled_at: Utc::now(),
            };
        } else {
            debug!(
                "Discarding result of superseded analysis (generation {})",
                generation
            );
        }

        outcome
    }
}

impl Default for PredictionSession {
    fn default() -> Self {
        Self::new()
    }
}
