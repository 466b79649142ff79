//! Neon-on-charcoal style tokens.
//!
//! Accent cyan for focus, green for gains, pink for losses, orange for
//! warnings, purple for neutral info, steel blue for muted text.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

/// Gains green, losses and zero pink, NaN neutral.
pub fn pnl_color(value: f64) -> Color {
    if value > 0.0 {
        POSITIVE
    } else if value <= 0.0 {
        NEGATIVE
    } else {
        NEUTRAL
    }
}

pub fn pnl(value: f64) -> Style {
    Style::default().fg(pnl_color(value))
}

/// Highlighted row under the cursor.
pub fn selected() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_colors() {
        assert_eq!(pnl_color(100.0), POSITIVE);
        assert_eq!(pnl_color(-50.0), NEGATIVE);
        assert_eq!(pnl_color(0.0), NEGATIVE);
        assert_eq!(pnl_color(f64::NAN), NEUTRAL);
    }

    #[test]
    fn panel_styles_follow_focus() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
        assert_eq!(panel_title(true), accent_bold());
    }
}
