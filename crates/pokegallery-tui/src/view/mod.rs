pub mod detail;
pub mod gallery;
pub mod help;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode, Screen};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` characters, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Bottom row: the active notice if any, otherwise key hints.
pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if let Some(pinned) = &app.notice {
        Line::from(Span::styled(
            format!(" {}", pinned.notice.message),
            Style::default()
                .fg(theme.notice_color(pinned.notice.level))
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        let hints = match (app.screen, app.input_mode) {
            (_, InputMode::Search) => " type to search  Enter:apply now  Esc:leave search",
            (Screen::Gallery, InputMode::Normal) => {
                " j/k:move  h/l:page  Enter:details  /:search  Esc:clear search  r:reload  ?:help  q:quit"
            }
            (Screen::Detail, InputMode::Normal) => " Tab:next tab  r:reload  Esc:back  ?:help  q:quit",
        };
        Line::from(Span::styled(hints, theme.footer_style()))
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("pokémon", 7), "pokémon");
        assert_eq!(truncate("charizard", 5), "char\u{2026}");
        assert_eq!(truncate("x", 0), "");
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner_char(0), spinner_char(SPINNER_FRAMES.len()));
    }
}
