use log::{error, info, warn};

use crate::clipboard::Clipboard;
use crate::color::{self, ColorFormat};
use crate::feedback::CopyFeedback;
use crate::sampler::{SampleError, SampleResult, Sampler};
use crate::session::Session;
use crate::storage::{self, KeyValueStore};
use crate::view::SessionView;

/// One popup activation: the session plus the collaborators its intents
/// reach out to. Intents that touch the current color, recent colors or
/// theme re-persist those three fields.
pub struct Popup<St, Sa, C> {
    session: Session,
    store: St,
    sampler: Sa,
    clipboard: C,
    feedback: CopyFeedback,
}

impl<St, Sa, C> Popup<St, Sa, C>
where
    St: KeyValueStore,
    Sa: Sampler,
    C: Clipboard,
{
    pub fn activate(store: St, sampler: Sa, clipboard: C) -> Self {
        Self::with_feedback(store, sampler, clipboard, CopyFeedback::default())
    }

    pub fn with_feedback(store: St, sampler: Sa, clipboard: C, feedback: CopyFeedback) -> Self {
        let session = Session::initialize(storage::restore(&store));
        info!(
            "Popup activated with {} recent colors, theme {:?}",
            session.recent_colors.len(),
            session.theme
        );
        Self {
            session,
            store,
            sampler,
            clipboard,
            feedback,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn copy_feedback_visible(&self) -> bool {
        self.feedback.is_visible()
    }

    pub fn view(&self) -> SessionView {
        SessionView::new(&self.session, self.feedback.is_visible())
    }

    fn apply(&mut self, transition: impl FnOnce(Session) -> Session) {
        let session = std::mem::take(&mut self.session);
        self.session = transition(session);
    }

    fn persist(&mut self) {
        if let Err(e) = storage::persist(&mut self.store, &self.session) {
            error!("Failed to persist session: {:#}", e);
        }
    }

    pub fn pick_color(&mut self, sampled: &str) -> &Session {
        self.apply(|s| s.pick_color(sampled));
        self.persist();
        &self.session
    }

    pub fn select_format(&mut self, format: ColorFormat) -> &Session {
        self.apply(|s| s.select_format(format));
        &self.session
    }

    pub fn toggle_theme(&mut self) -> &Session {
        self.apply(Session::toggle_theme);
        self.persist();
        &self.session
    }

    pub fn select_recent_color(&mut self, token: &str) -> &Session {
        self.apply(|s| s.select_recent_color(token));
        self.persist();
        &self.session
    }

    pub fn delete_recent_color(&mut self, token: &str) -> &Session {
        self.apply(|s| s.delete_recent_color(token));
        self.persist();
        &self.session
    }

    pub fn clear_all(&mut self) -> &Session {
        self.apply(Session::clear_all);
        self.persist();
        &self.session
    }

    pub fn sampler(&self) -> &Sa {
        &self.sampler
    }

    /// Only an unavailable sampler is reported back. Cancellation and other
    /// failures are logged and yield `Ok(None)` with the session untouched.
    pub async fn request_sample(&mut self) -> Result<Option<String>, SampleError> {
        if !self.sampler.is_available() {
            warn!("Color sampling requested but no sampler is available");
            return Err(SampleError::Unsupported);
        }
        let outcome = self.sampler.open().await;
        self.accept_sample(outcome)
    }

    /// Applies the outcome of a sampler opened outside this popup, e.g. by a
    /// host that must not hold the popup while the picker is up.
    pub fn accept_sample(
        &mut self,
        outcome: Result<SampleResult, SampleError>,
    ) -> Result<Option<String>, SampleError> {
        match outcome {
            Ok(result) => match color::normalize_token(&result.srgb_hex) {
                Some(token) => {
                    info!("Sampled color {}", token);
                    self.pick_color(&token);
                    Ok(Some(token))
                }
                None => {
                    error!("Failed to pick color: unparsable sample '{}'", result.srgb_hex);
                    Ok(None)
                }
            },
            Err(SampleError::Unsupported) => Err(SampleError::Unsupported),
            Err(e) => {
                error!("Failed to pick color: {}", e);
                Ok(None)
            }
        }
    }

    /// Copies the formatted current color and flashes the feedback flag.
    /// Returns the copied text, or `None` when there is nothing to copy.
    pub async fn copy_formatted(&mut self) -> Option<String> {
        let text = self.session.formatted();
        if text.is_empty() {
            return None;
        }
        if let Err(e) = self.clipboard.write_text(&text).await {
            error!("Failed to write '{}' to clipboard: {:#}", text, e);
        }
        self.feedback.show();
        Some(text)
    }
}
