//! Shared helpers for reducer tests.

use std::sync::{Arc, Mutex};

use steamtrack_core::{Identity, PlayerAchievement, SchemaAchievement};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub(crate) fn identity() -> Identity {
    Identity::new("76561198000000000", "TESTKEY").unwrap()
}

/// `total` achievement rows of which the first `unlocked` are unlocked.
pub(crate) fn achievements(unlocked: usize, total: usize) -> Vec<PlayerAchievement> {
    (0..total)
        .map(|i| PlayerAchievement::new(format!("ACH_{i}"), i < unlocked))
        .collect()
}

pub(crate) fn schema(total: usize) -> Vec<SchemaAchievement> {
    (0..total)
        .map(|i| SchemaAchievement::new(format!("ACH_{i}")))
        .collect()
}

// ============================================================================
// Log Capture
// ============================================================================

/// Records the level of every event emitted while installed.
#[derive(Clone, Default)]
pub(crate) struct LevelRecorder {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl LevelRecorder {
    /// Installs the recorder as the thread's default subscriber.
    pub(crate) fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn count(&self, level: Level) -> usize {
        self.levels.lock().unwrap().iter().filter(|l| **l == level).count()
    }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.levels.lock().unwrap().push(*event.metadata().level());
    }
}
