/// Derives the toolbar icon presentation for a tab.
///
/// The presenter is pure: the coordinator feeds it the registry state and the
/// restricted-page check and hands the result to the browser.
use crate::registry::Activation;

pub const ACTIVE_COLOR: &str = "#22C55E";
pub const INACTIVE_COLOR: &str = "#6B7280";
pub const RESTRICTED_COLOR: &str = "#9CA3AF";

/// A single space renders as a colored dot.
pub const DOT_BADGE: &str = " ";
pub const RESTRICTED_BADGE: &str = "×";

pub const ACTIVE_TITLE: &str = "Screen Saver: on (press ESC to exit)";
pub const INACTIVE_TITLE: &str = "Toggle Screen Saver";
pub const RESTRICTED_TITLE: &str = "Screen Saver is not available on this page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconState {
    pub badge_color: &'static str,
    pub badge_text: &'static str,
    pub enabled: bool,
    pub title: &'static str,
}

pub fn present(activation: Activation, restricted: bool) -> IconState {
    if restricted {
        return IconState {
            badge_color: RESTRICTED_COLOR,
            badge_text: RESTRICTED_BADGE,
            enabled: false,
            title: RESTRICTED_TITLE,
        };
    }

    match activation {
        Activation::Active => IconState {
            badge_color: ACTIVE_COLOR,
            badge_text: DOT_BADGE,
            enabled: true,
            title: ACTIVE_TITLE,
        },
        Activation::Inactive => IconState {
            badge_color: INACTIVE_COLOR,
            badge_text: DOT_BADGE,
            enabled: true,
            title: INACTIVE_TITLE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_inactive_differ_only_in_color_and_title() {
        let on = present(Activation::Active, false);
        let off = present(Activation::Inactive, false);

        assert_eq!(on.badge_color, ACTIVE_COLOR);
        assert_eq!(off.badge_color, INACTIVE_COLOR);
        assert_eq!(on.badge_text, off.badge_text);
        assert!(on.enabled && off.enabled);
        assert_ne!(on.title, off.title);
    }

    #[test]
    fn test_restricted_wins_over_activation() {
        let state = present(Activation::Active, true);

        assert!(!state.enabled);
        assert_eq!(state.badge_text, RESTRICTED_BADGE);
        assert_eq!(state.title, RESTRICTED_TITLE);
        assert_eq!(state, present(Activation::Inactive, true));
    }
}
