use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Default)]
struct FeedbackState {
    visible: bool,
    generation: u64,
}

/// The "Copied!" indicator. Each `show` restarts the hide window; a hide task
/// only acts if no newer `show` happened since it was scheduled.
#[derive(Debug)]
pub struct CopyFeedback {
    state: Arc<Mutex<FeedbackState>>,
    duration: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(COPY_FEEDBACK_DURATION)
    }
}

impl CopyFeedback {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedbackState::default())),
            duration,
            pending: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).visible
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&mut self) {
        let generation = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.generation += 1;
            state.visible = true;
            state.generation
        };
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                state.visible = false;
                debug!("Copy feedback hidden (generation {})", generation);
            }
        }));
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
