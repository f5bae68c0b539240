use pokegallery_core::detail::StatBand;
use pokegallery_core::NoticeLevel;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
pub struct Theme {
    pub name: &'static str,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
    pub info: Color,
    pub error: Color,

    pub stat_excellent: Color,
    pub stat_good: Color,
    pub stat_fair: Color,
    pub stat_low: Color,
}

impl Theme {
    /// Light-on-dark theme with a red header.
    pub fn classic() -> Self {
        Self {
            name: "classic",
            header_fg: Color::White,
            header_bg: Color::Rgb(204, 0, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(60, 30, 30),
            active: Color::Yellow,
            spinner: Color::Yellow,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
            info: Color::Yellow,
            error: Color::Red,
            stat_excellent: Color::Rgb(82, 196, 26),
            stat_good: Color::Rgb(24, 144, 255),
            stat_fair: Color::Rgb(250, 173, 20),
            stat_low: Color::Rgb(255, 77, 79),
        }
    }

    /// Muted blues for dark terminals.
    pub fn night() -> Self {
        Self {
            name: "night",
            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::Rgb(220, 220, 235),
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
            info: Color::Rgb(255, 200, 0),
            error: Color::Rgb(255, 80, 80),
            stat_excellent: Color::Rgb(0, 200, 80),
            stat_good: Color::Rgb(60, 140, 255),
            stat_fair: Color::Rgb(255, 200, 0),
            stat_low: Color::Rgb(255, 80, 80),
        }
    }

    /// Unknown names fall back to classic.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "night" => Self::night(),
            "classic" => Self::classic(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using classic");
                Self::classic()
            }
        }
    }

    pub fn stat_color(&self, band: StatBand) -> Color {
        match band {
            StatBand::Excellent => self.stat_excellent,
            StatBand::Good => self.stat_good,
            StatBand::Fair => self.stat_fair,
            StatBand::Low => self.stat_low,
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Error => self.error,
        }
    }

    /// Badge color for an elemental type.
    pub fn type_color(&self, kind: &str) -> Color {
        match kind {
            "normal" => Color::Rgb(168, 167, 122),
            "fire" => Color::Rgb(238, 129, 48),
            "water" => Color::Rgb(99, 144, 240),
            "electric" => Color::Rgb(247, 208, 44),
            "grass" => Color::Rgb(122, 199, 76),
            "ice" => Color::Rgb(150, 217, 214),
            "fighting" => Color::Rgb(194, 46, 40),
            "poison" => Color::Rgb(163, 62, 161),
            "ground" => Color::Rgb(226, 191, 101),
            "flying" => Color::Rgb(169, 143, 243),
            "psychic" => Color::Rgb(249, 85, 135),
            "bug" => Color::Rgb(166, 185, 26),
            "rock" => Color::Rgb(182, 161, 54),
            "ghost" => Color::Rgb(115, 87, 151),
            "dragon" => Color::Rgb(111, 53, 252),
            "dark" => Color::Rgb(112, 87, 70),
            "steel" => Color::Rgb(183, 183, 206),
            "fairy" => Color::Rgb(214, 133, 173),
            _ => self.dim,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
