use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::color::{self, ColorFormat};

pub const MAX_RECENT_COLORS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Whatever the store still had from the previous activation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredSession {
    pub recent_colors: Option<Vec<String>>,
    pub last_color: Option<String>,
    pub theme: Option<Theme>,
}

/// Full state of one popup activation. Transitions consume the session and
/// return the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub current_color: Option<String>,
    pub format: ColorFormat,
    pub recent_colors: Vec<String>,
    pub theme: Theme,
}

impl Session {
    pub fn initialize(restored: RestoredSession) -> Self {
        let current_color = restored.last_color.and_then(|token| {
            if token.is_empty() {
                return None;
            }
            let normalized = color::normalize_token(&token);
            if normalized.is_none() {
                warn!("Discarding unparsable stored color '{}'", token);
            }
            normalized
        });

        let mut recent_colors: Vec<String> = Vec::new();
        for token in restored.recent_colors.unwrap_or_default() {
            match color::normalize_token(&token) {
                Some(token) if !recent_colors.iter().any(|c| color::same_color(c, &token)) => {
                    recent_colors.push(token)
                }
                Some(_) => debug!("Dropping duplicate stored recent color '{}'", token),
                None => warn!("Discarding unparsable stored recent color '{}'", token),
            }
        }
        recent_colors.truncate(MAX_RECENT_COLORS);

        Self {
            current_color,
            format: ColorFormat::default(),
            recent_colors,
            theme: restored.theme.unwrap_or_default(),
        }
    }

    pub fn current_color(&self) -> &str {
        self.current_color.as_deref().unwrap_or("")
    }

    pub fn formatted(&self) -> String {
        color::format_color(self.current_color(), self.format)
    }

    #[must_use]
    pub fn pick_color(mut self, sampled: &str) -> Self {
        let Some(token) = color::normalize_token(sampled) else {
            warn!("Ignoring unparsable picked color '{}'", sampled);
            return self;
        };
        self.recent_colors.retain(|c| !color::same_color(c, &token));
        self.recent_colors.insert(0, token.clone());
        self.recent_colors.truncate(MAX_RECENT_COLORS);
        self.current_color = Some(token);
        self
    }

    #[must_use]
    pub fn select_format(mut self, format: ColorFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn toggle_theme(mut self) -> Self {
        self.theme = self.theme.toggled();
        self
    }

    #[must_use]
    pub fn select_recent_color(mut self, token: &str) -> Self {
        match color::normalize_token(token) {
            Some(token) => self.current_color = Some(token),
            None => warn!("Ignoring unparsable selected color '{}'", token),
        }
        self
    }

    #[must_use]
    pub fn delete_recent_color(mut self, token: &str) -> Self {
        self.recent_colors.retain(|c| !color::same_color(c, token));
        if self
            .current_color
            .as_deref()
            .is_some_and(|current| color::same_color(current, token))
        {
            self.current_color = None;
        }
        self
    }

    #[must_use]
    pub fn clear_all(mut self) -> Self {
        self.recent_colors.clear();
        self.current_color = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_duplicates(colors: &[String]) -> bool {
        colors
            .iter()
            .enumerate()
            .any(|(i, a)| colors[i + 1..].iter().any(|b| color::same_color(a, b)))
    }

    #[test]
    fn initialize_defaults() {
        let session = Session::initialize(RestoredSession::default());
        assert_eq!(session.current_color, None);
        assert_eq!(session.format, ColorFormat::Hex);
        assert_eq!(session.theme, Theme::Light);
        assert!(session.recent_colors.is_empty());
        assert_eq!(session.formatted(), "");
    }

    #[test]
    fn initialize_keeps_restored_values() {
        let session = Session::initialize(RestoredSession {
            recent_colors: Some(vec!["#112233".into(), "aabbcc".into()]),
            last_color: Some("#112233".into()),
            theme: Some(Theme::Dark),
        });
        assert_eq!(session.current_color.as_deref(), Some("#112233"));
        assert_eq!(session.recent_colors, vec!["#112233", "#aabbcc"]);
        assert_eq!(session.theme, Theme::Dark);
        assert_eq!(session.format, ColorFormat::Hex);
    }

    #[test]
    fn initialize_drops_bad_tokens() {
        let session = Session::initialize(RestoredSession {
            recent_colors: Some(vec!["nope".into(), "#112233".into(), "#112233".into()]),
            last_color: Some("#12".into()),
            theme: None,
        });
        assert_eq!(session.current_color, None);
        assert_eq!(session.recent_colors, vec!["#112233"]);
    }

    #[test]
    fn pick_moves_existing_color_to_front() {
        let session = Session::default().pick_color("#AABBCC");
        assert_eq!(session.recent_colors, vec!["#AABBCC"]);
        let session = session.pick_color("#112233");
        assert_eq!(session.recent_colors, vec!["#112233", "#AABBCC"]);
        let session = session.pick_color("#AABBCC");
        assert_eq!(session.recent_colors, vec!["#AABBCC", "#112233"]);
        assert_eq!(session.current_color(), "#AABBCC");
    }

    #[test]
    fn pick_dedupes_across_case() {
        let session = Session::default().pick_color("#aabbcc").pick_color("#112233").pick_color("#AABBCC");
        assert_eq!(session.recent_colors, vec!["#AABBCC", "#112233"]);
    }

    #[test]
    fn recency_invariants_hold_over_many_picks() {
        let mut session = Session::default();
        // cycle through 20 distinct colors with frequent repeats
        for i in 0u32..200 {
            let token = format!("#{:06x}", (i * 7919) % 20);
            session = session.pick_color(&token);
            assert_eq!(session.recent_colors[0], token);
            assert!(session.recent_colors.len() <= MAX_RECENT_COLORS);
            assert!(!has_duplicates(&session.recent_colors));
        }
        assert_eq!(session.recent_colors.len(), MAX_RECENT_COLORS);
    }

    #[test]
    fn pick_evicts_oldest_beyond_capacity() {
        let mut session = Session::default();
        for i in 0..13 {
            session = session.pick_color(&format!("#0000{:02x}", i));
        }
        assert_eq!(session.recent_colors.len(), 12);
        assert_eq!(session.recent_colors[0], "#00000c");
        assert_eq!(session.recent_colors[11], "#000001");
        assert!(!session.recent_colors.contains(&"#000000".to_string()));
    }

    #[test]
    fn pick_ignores_unparsable_token() {
        let session = Session::default().pick_color("#123456");
        let after = session.clone().pick_color("bogus");
        assert_eq!(after, session);
    }

    #[test]
    fn pick_without_hash_is_stored_prefixed() {
        let session = Session::default().pick_color("a1b2c3");
        assert_eq!(session.current_color(), "#a1b2c3");
    }

    #[test]
    fn select_format_changes_only_format() {
        let session = Session::default().pick_color("#1a2b3c");
        let next = session.clone().select_format(ColorFormat::Rgb);
        assert_eq!(next.formatted(), "rgb(26, 43, 60)");
        assert_eq!(next.recent_colors, session.recent_colors);
        assert_eq!(next.current_color, session.current_color);
    }

    #[test]
    fn toggle_theme_flips() {
        let session = Session::default().toggle_theme();
        assert_eq!(session.theme, Theme::Dark);
        assert_eq!(session.toggle_theme().theme, Theme::Light);
    }

    #[test]
    fn select_recent_keeps_order() {
        let session = Session::default().pick_color("#111111").pick_color("#222222");
        let next = session.clone().select_recent_color("#111111");
        assert_eq!(next.current_color(), "#111111");
        assert_eq!(next.recent_colors, session.recent_colors);
    }

    #[test]
    fn delete_current_clears_it() {
        let session = Session::default().pick_color("#111111").pick_color("#222222");
        let next = session.delete_recent_color("#222222");
        assert_eq!(next.current_color, None);
        assert_eq!(next.recent_colors, vec!["#111111"]);
    }

    #[test]
    fn delete_other_keeps_current() {
        let session = Session::default().pick_color("#111111").pick_color("#222222");
        let next = session.delete_recent_color("#111111");
        assert_eq!(next.current_color(), "#222222");
        assert_eq!(next.recent_colors, vec!["#222222"]);
    }

    #[test]
    fn delete_matches_case_insensitively() {
        let session = Session::default().pick_color("#aabbcc");
        let next = session.delete_recent_color("#AABBCC");
        assert_eq!(next.current_color, None);
        assert!(next.recent_colors.is_empty());
    }

    #[test]
    fn delete_with_doubled_hash_matches_nothing() {
        let session = Session::default().pick_color("#aabbcc");
        let next = session.clone().delete_recent_color("##aabbcc");
        assert_eq!(next, session);
    }

    #[test]
    fn clear_all_empties_everything_but_theme() {
        let session = Session::default()
            .pick_color("#111111")
            .toggle_theme()
            .select_format(ColorFormat::Hsl)
            .clear_all();
        assert!(session.recent_colors.is_empty());
        assert_eq!(session.current_color, None);
        assert_eq!(session.theme, Theme::Dark);
        assert_eq!(session.format, ColorFormat::Hsl);
    }
}
