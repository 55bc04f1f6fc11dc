use serde::Serialize;

use crate::color::ColorFormat;
use crate::session::{Session, Theme};

/// What a presentation layer needs to draw the popup after an intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub current_color: String,
    pub formatted: String,
    pub format: ColorFormat,
    pub theme: Theme,
    pub recent_colors: Vec<String>,
    pub copy_feedback_visible: bool,
}

impl SessionView {
    pub fn new(session: &Session, copy_feedback_visible: bool) -> Self {
        Self {
            current_color: session.current_color().to_string(),
            formatted: session.formatted(),
            format: session.format,
            theme: session.theme,
            recent_colors: session.recent_colors.clone(),
            copy_feedback_visible,
        }
    }
}
