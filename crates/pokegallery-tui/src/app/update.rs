use super::{App, DetailState, InputMode, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| self.tick >= n.expires_at)
                {
                    self.notice = None;
                }
                return false;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Help overlay swallows everything but its own dismissal
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        match self.input_mode {
            InputMode::Search => self.update_search(action),
            InputMode::Normal => match self.screen {
                Screen::Gallery => self.update_gallery(action),
                Screen::Detail => self.update_detail(action),
            },
        }
        self.should_quit
    }

    fn update_search(&mut self, action: Action) {
        match action {
            Action::SearchInput(ch) => {
                self.search_input.push(ch);
                self.controller.on_search_text_change(&self.search_input);
            }
            Action::SearchBackspace => {
                if self.search_input.pop().is_some() {
                    self.controller.on_search_text_change(&self.search_input);
                }
            }
            Action::SearchConfirm => {
                self.controller.cancel_pending_search();
                if let Some(ticket) = self.controller.commit_search_text(&self.search_input) {
                    self.run_ticket(ticket);
                }
                self.input_mode = InputMode::Normal;
            }
            Action::SearchCancel => {
                // Pending text still commits when its delay runs out.
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn update_gallery(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                let len = self.controller.state().displayed_records.len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::NextPage => {
                let next = self.controller.state().current_page + 1;
                if let Some(ticket) = self.controller.on_page_change(next) {
                    self.run_ticket(ticket);
                }
            }
            Action::PrevPage => {
                let prev = self.controller.state().current_page.saturating_sub(1);
                if let Some(ticket) = self.controller.on_page_change(prev) {
                    self.run_ticket(ticket);
                }
            }
            Action::DrillIn => {
                if let Some(name) = self.selected_record().map(|r| r.name.clone()) {
                    self.open_detail(name);
                }
            }
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
            }
            Action::NavigateBack => {
                if !self.search_input.is_empty() {
                    self.search_input.clear();
                    self.controller.cancel_pending_search();
                    if let Some(ticket) = self.controller.commit_search_text("") {
                        self.run_ticket(ticket);
                    }
                }
            }
            Action::Refresh => {
                let ticket = self.controller.refresh();
                self.run_ticket(ticket);
            }
            Action::ToggleHelp => self.show_help = true,
            _ => {}
        }
    }

    fn update_detail(&mut self, action: Action) {
        match action {
            Action::NextTab => {
                self.detail_tab = self.detail_tab.next();
            }
            Action::NavigateBack => {
                self.screen = Screen::Gallery;
                self.detail = None;
            }
            Action::Refresh => {
                let name = match &self.detail {
                    Some(DetailState::Ready(view)) => Some(view.name.clone()),
                    Some(DetailState::Loading { name }) => Some(name.clone()),
                    _ => self.selected_record().map(|r| r.name.clone()),
                };
                if let Some(name) = name {
                    let tab = self.detail_tab;
                    self.open_detail(name);
                    self.detail_tab = tab;
                }
            }
            Action::ToggleHelp => self.show_help = true,
            _ => {}
        }
    }
}
