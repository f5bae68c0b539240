use pokegallery_core::Mode;
use pokegallery_core::detail::capitalize_first;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{App, InputMode};
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

/// Render the gallery screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let [header, search, body, pager] = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // search box
        Constraint::Min(3),    // cards
        Constraint::Length(1), // pagination
    ])
    .areas(area);

    render_header(f, header, app, theme);
    render_search_box(f, search, app, theme);
    render_cards(f, body, app, theme);
    render_pager(f, pager, app, theme);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let view = app.controller.view();
    let mode = match view.mode {
        Mode::Browse => " Browse",
        Mode::Search => " Search",
    };
    let mut spans = vec![
        Span::styled(" PokéGallery ", theme.header_style()),
        Span::styled(
            mode,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if view.loading {
        spans.push(Span::styled(
            format!("  {} Loading...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_box(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.input_mode == InputMode::Search;
    let border = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let mut spans = vec![Span::styled(&app.search_input, Style::default().fg(theme.text))];
    if focused {
        spans.push(Span::styled("\u{2588}", Style::default().fg(theme.active)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled(
            "press / to search by name",
            Style::default().fg(theme.dim),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_cards(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let view = app.controller.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());

    if view.not_found {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No Pokémon found.",
            Style::default().fg(theme.info).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(msg, area);
        return;
    }
    if view.records.is_empty() {
        let text = if view.loading {
            format!("{} Loading Pokémon...", spinner_char(app.tick))
        } else {
            String::new()
        };
        let msg = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(["#", "Name", "Types", "Height", "Weight"].map(|h| {
        Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }));

    // Rows from the previous batch stay visible but dimmed while loading.
    let row_style = if view.loading {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.text)
    };
    let name_width = (area.width as usize).saturating_sub(48).max(10);

    let rows: Vec<Row> = view
        .records
        .iter()
        .map(|r| {
            let types: Vec<Span> = r
                .type_names()
                .into_iter()
                .flat_map(|t| {
                    [
                        Span::styled(t.to_string(), Style::default().fg(theme.type_color(t))),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Row::new(vec![
                Cell::from(format!("#{:03}", r.id)),
                Cell::from(truncate(&capitalize_first(&r.name), name_width)),
                Cell::from(Line::from(types)),
                Cell::from(format!("{:.1} m", f64::from(r.height) / 10.0)),
                Cell::from(format!("{:.1} kg", f64::from(r.weight) / 10.0)),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(theme.highlight_style())
    .highlight_symbol("\u{25B6} ");

    let mut state = TableState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_pager(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let view = app.controller.view();
    let line = if view.pagination_visible {
        let prev = if view.current_page > 1 { "\u{25C0}" } else { " " };
        let next = if view.current_page < view.page_count {
            "\u{25B6}"
        } else {
            " "
        };
        Line::from(vec![
            Span::styled(
                format!(" {prev} Page {} / {} {next}", view.current_page, view.page_count),
                Style::default().fg(theme.active),
            ),
            Span::styled(
                format!("  \u{00B7}  {} Pokémon", view.total),
                Style::default().fg(theme.dim),
            ),
        ])
    } else if view.mode == Mode::Search && !view.loading && !view.not_found {
        Line::from(Span::styled(
            format!(" {} result(s)", view.records.len()),
            Style::default().fg(theme.dim),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}
