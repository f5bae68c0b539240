use pokegallery_core::DetailView;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};

use crate::app::{App, DetailState, DetailTab};
use crate::theme::Theme;
use crate::view::spinner_char;

const BAR_WIDTH: usize = 30;

/// Render the detail screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let [header, tabs, body] = Layout::vertical([
        Constraint::Length(2), // heading + types
        Constraint::Length(1), // tabs
        Constraint::Min(3),    // tab content
    ])
    .areas(area);

    match &app.detail {
        Some(DetailState::Ready(view)) => {
            render_heading(f, header, view, theme);
            render_tabs(f, tabs, app.detail_tab, theme);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style());
            let inner = block.inner(body);
            f.render_widget(block, body);
            match app.detail_tab {
                DetailTab::Stats => render_stats(f, inner, view, theme),
                DetailTab::Details => render_details(f, inner, view, theme),
                DetailTab::Moves => render_moves(f, inner, view, theme),
            }
        }
        Some(DetailState::Loading { name }) => {
            let line = Line::from(Span::styled(
                format!("{} Loading {}...", spinner_char(app.tick), name),
                Style::default().fg(theme.spinner),
            ));
            f.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                body,
            );
        }
        Some(DetailState::Failed(message)) => {
            let line = Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ));
            f.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                body,
            );
        }
        None => {}
    }
}

fn render_heading(f: &mut Frame, area: Rect, view: &DetailView, theme: &Theme) {
    let title = Line::from(vec![
        Span::styled(" PokéGallery ", theme.header_style()),
        Span::styled(" > ", Style::default().fg(theme.dim)),
        Span::styled(
            view.heading.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    let mut badges = vec![Span::raw(" ")];
    for kind in &view.types {
        badges.push(Span::styled(
            format!(" {} ", kind.to_uppercase()),
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.type_color(kind))
                .add_modifier(Modifier::BOLD),
        ));
        badges.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(vec![title, Line::from(badges)]), area);
}

fn render_tabs(f: &mut Frame, area: Rect, selected: DetailTab, theme: &Theme) {
    let tabs = Tabs::new(DetailTab::ALL.iter().map(|t| t.title()))
        .select(selected.index())
        .style(Style::default().fg(theme.dim))
        .highlight_style(
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn stat_bar(percent: f64) -> (String, String) {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    ("\u{2588}".repeat(filled), "\u{2591}".repeat(BAR_WIDTH - filled))
}

fn render_stats(f: &mut Frame, area: Rect, view: &DetailView, theme: &Theme) {
    let mut lines: Vec<Line> = view
        .stats
        .iter()
        .map(|s| {
            let (filled, empty) = stat_bar(s.percent);
            Line::from(vec![
                Span::styled(format!("  {:<16}", s.label), Style::default().fg(theme.dim)),
                Span::styled(
                    format!("{:>3} ", s.value),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(filled, Style::default().fg(theme.stat_color(s.band))),
                Span::styled(empty, Style::default().fg(theme.border)),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No stats available.",
            Style::default().fg(theme.dim),
        )));
    }
    if let Some(url) = &view.artwork_url {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Artwork         ", Style::default().fg(theme.dim)),
            Span::styled(
                url.as_str(),
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn labeled_line<'a>(lines: &mut Vec<Line<'a>>, label: &'a str, value: String, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<16}"), Style::default().fg(theme.dim)),
        Span::styled(value, Style::default().fg(theme.text)),
    ]));
}

fn render_details(f: &mut Frame, area: Rect, view: &DetailView, theme: &Theme) {
    let mut lines = Vec::new();
    labeled_line(&mut lines, "Height", format!("{:.1} m", view.height_m), theme);
    labeled_line(&mut lines, "Weight", format!("{:.1} kg", view.weight_kg), theme);
    if let Some(exp) = view.base_experience {
        labeled_line(&mut lines, "Base experience", exp.to_string(), theme);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Abilities",
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    )));
    for ability in &view.abilities {
        let mut spans = vec![Span::styled(
            format!("    {}", ability.label),
            Style::default().fg(theme.text),
        )];
        if ability.hidden {
            spans.push(Span::styled(" (hidden)", Style::default().fg(theme.dim)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(entry) = &view.pokedex_entry {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Pokédex entry",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {entry}"),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_moves(f: &mut Frame, area: Rect, view: &DetailView, theme: &Theme) {
    if view.moves.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("  No moves listed.", Style::default().fg(theme.dim))),
            area,
        );
        return;
    }
    let header = Row::new(["Move", "Learned"].map(|h| {
        Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }));
    let rows = view.moves.iter().map(|m| {
        let learned = if m.learned == "TM/TR" {
            m.learned.clone()
        } else {
            format!("Lv. {}", m.learned)
        };
        Row::new(vec![
            Cell::from(m.label.as_str()),
            Cell::from(learned).style(Style::default().fg(theme.dim)),
        ])
        .style(Style::default().fg(theme.text))
    });
    let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(10)]).header(header);
    f.render_widget(table, area);
}
