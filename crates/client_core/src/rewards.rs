//! Transient floating reward notifications.
//!
//! Every notification gets its own expiry task on the supplied runtime; the
//! task removes the notification by id if it is still present.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use shared::domain::{RewardId, ScreenPoint};
use tokio::runtime::Handle;
use tracing::debug;

pub const REWARD_DISPLAY_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq)]
pub struct RewardEvent {
    pub id: RewardId,
    pub amount: u64,
    pub label: String,
    pub position: ScreenPoint,
    pub shown_at: Instant,
}

impl RewardEvent {
    /// Fraction of the display window already elapsed, clamped to `0.0..=1.0`.
    pub fn progress(&self, now: Instant, display_for: Duration) -> f32 {
        if display_for.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.shown_at);
        (elapsed.as_secs_f32() / display_for.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Default)]
struct NotifierState {
    next_id: u64,
    active: Vec<RewardEvent>,
}

#[derive(Clone)]
pub struct RewardNotifier {
    state: Arc<Mutex<NotifierState>>,
    runtime: Handle,
    display_for: Duration,
}

impl RewardNotifier {
    pub fn new(runtime: Handle) -> Self {
        Self::with_display_duration(runtime, REWARD_DISPLAY_DURATION)
    }

    pub fn with_display_duration(runtime: Handle, display_for: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NotifierState::default())),
            runtime,
            display_for,
        }
    }

    pub fn display_duration(&self) -> Duration {
        self.display_for
    }

    pub fn show(&self, amount: u64, label: impl Into<String>, position: ScreenPoint) -> RewardId {
        let id = {
            let mut state = lock(&self.state);
            state.next_id += 1;
            let id = RewardId(state.next_id);
            state.active.push(RewardEvent {
                id,
                amount,
                label: label.into(),
                position,
                shown_at: Instant::now(),
            });
            id
        };

        let state = Arc::clone(&self.state);
        let display_for = self.display_for;
        self.runtime.spawn(async move {
            tokio::time::sleep(display_for).await;
            let mut state = lock(&state);
            state.active.retain(|event| event.id != id);
        });

        debug!(reward_id = id.0, amount, "reward shown");
        id
    }

    /// Active notifications in the order they were shown.
    pub fn active(&self) -> Vec<RewardEvent> {
        lock(&self.state).active.clone()
    }

    pub fn is_active(&self, id: RewardId) -> bool {
        lock(&self.state).active.iter().any(|event| event.id == id)
    }

    pub fn has_active(&self) -> bool {
        !lock(&self.state).active.is_empty()
    }
}

fn lock(state: &Mutex<NotifierState>) -> MutexGuard<'_, NotifierState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/rewards_tests.rs"]
mod tests;
