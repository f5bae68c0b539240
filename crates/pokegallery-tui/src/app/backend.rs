use pokegallery_core::{ApplyOutcome, Notice, NoticeLevel};

use super::{App, DetailState, Screen};
use crate::tui_event::{BackendEvent, DetailError};

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Batch { ticket, outcome } => {
                let applied = self.controller.apply(&ticket, outcome);
                if applied != ApplyOutcome::Stale {
                    self.clamp_cursor();
                }
                if let Some(notice) = self.controller.take_notice() {
                    self.show_notice(notice);
                }
            }
            BackendEvent::Detail { request, result } => {
                if request != self.detail_request || self.screen != Screen::Detail {
                    tracing::trace!(request, "dropping superseded detail reply");
                    return;
                }
                match result {
                    Ok(view) => self.detail = Some(DetailState::Ready(view)),
                    Err(DetailError::NotFound(name)) => {
                        let message = format!("No Pokémon named \"{}\"", name);
                        self.detail = Some(DetailState::Failed(message.clone()));
                        self.show_notice(Notice {
                            level: NoticeLevel::Info,
                            message,
                        });
                    }
                    Err(DetailError::Failed(error)) => {
                        tracing::warn!(%error, "detail load failed");
                        let message = "Failed to fetch Pokémon details".to_string();
                        self.detail = Some(DetailState::Failed(message.clone()));
                        self.show_notice(Notice {
                            level: NoticeLevel::Error,
                            message,
                        });
                    }
                }
            }
        }
    }
}
