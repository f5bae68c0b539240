mod backend;
mod update;

use std::time::Duration;

use pokegallery_core::{DetailKey, DetailRecord, DetailView, Notice, QueryController, Ticket};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// How long a footer notice stays visible, in ticks.
pub const NOTICE_TICKS: usize = 40;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Gallery,
    Detail,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keystrokes go to the search box.
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Stats,
    Details,
    Moves,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Stats, DetailTab::Details, DetailTab::Moves];

    pub fn next(self) -> Self {
        match self {
            DetailTab::Stats => DetailTab::Details,
            DetailTab::Details => DetailTab::Moves,
            DetailTab::Moves => DetailTab::Stats,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Stats => "Stats",
            DetailTab::Details => "Details",
            DetailTab::Moves => "Moves",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DetailTab::Stats => 0,
            DetailTab::Details => 1,
            DetailTab::Moves => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading { name: String },
    Ready(Box<DetailView>),
    Failed(String),
}

/// A notice pinned to the footer until `expires_at` (tick count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterNotice {
    pub notice: Notice,
    pub expires_at: usize,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub controller: QueryController,
    /// Raw search box contents; the controller sees it after the debounce.
    pub search_input: String,
    /// Selected card on the current page.
    pub cursor: usize,
    pub detail: Option<DetailState>,
    pub detail_tab: DetailTab,
    /// Tag of the latest detail request; older replies are dropped.
    pub(super) detail_request: u64,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    pub notice: Option<FooterNotice>,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(controller: QueryController, theme: Theme) -> Self {
        Self {
            screen: Screen::Gallery,
            input_mode: InputMode::Normal,
            controller,
            search_input: String::new(),
            cursor: 0,
            detail: None,
            detail_tab: DetailTab::Stats,
            detail_request: 0,
            tick: 0,
            theme,
            should_quit: false,
            show_help: false,
            notice: None,
            backend_cmd_tx: None,
        }
    }

    /// Issue the initial page-1 batch.
    pub fn start(&mut self) {
        let ticket = self.controller.refresh();
        self.run_ticket(ticket);
    }

    pub(super) fn dispatch(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!("backend command channel closed");
                }
            }
            None => tracing::debug!(?cmd, "no backend attached, dropping command"),
        }
    }

    pub(super) fn run_ticket(&mut self, ticket: Ticket) {
        self.cursor = 0;
        self.dispatch(BackendCommand::Run { ticket });
    }

    /// Commit the search box if its debounce delay has elapsed.
    pub fn poll_debounce(&mut self, now: Instant) {
        if let Some(ticket) = self.controller.poll_debounce(now) {
            self.run_ticket(ticket);
        }
    }

    /// How long the event loop may block: until the next tick or the pending
    /// search commit, whichever comes first.
    pub fn next_wakeup(&self, now: Instant, until_tick: Duration) -> Duration {
        match self.controller.debounce_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(until_tick),
            None => until_tick,
        }
    }

    pub fn selected_record(&self) -> Option<&DetailRecord> {
        self.controller.state().displayed_records.get(self.cursor)
    }

    pub(super) fn open_detail(&mut self, name: String) {
        self.detail_request += 1;
        self.detail = Some(DetailState::Loading { name: name.clone() });
        self.detail_tab = DetailTab::Stats;
        self.screen = Screen::Detail;
        self.dispatch(BackendCommand::LoadDetail {
            request: self.detail_request,
            key: DetailKey::Name(name),
        });
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(FooterNotice {
            notice,
            expires_at: self.tick + NOTICE_TICKS,
        });
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.controller.state().displayed_records.len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();
        let [body, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        match self.screen {
            Screen::Gallery => crate::view::gallery::render_in(f, self, body),
            Screen::Detail => crate::view::detail::render_in(f, self, body),
        }
        crate::view::render_footer(f, self, footer);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
