use std::sync::Arc;
use std::time::Duration;

use pokegallery_core::source::mock::MockSource;
use pokegallery_core::{BatchOutcome, Config, DetailView, NoticeLevel, SourceError, Ticket};
use tokio::sync::mpsc;

use super::*;
use crate::action::Action;
use crate::tui_event::{BackendEvent, DetailError};

/// Create an App wired to a command channel but no running backend.
fn test_app(source: MockSource) -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let controller = QueryController::new(Arc::new(source), &Config::default());
    let mut app = App::new(controller, Theme::classic());
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

fn expect_run(rx: &mut mpsc::UnboundedReceiver<BackendCommand>) -> Ticket {
    match rx.try_recv() {
        Ok(BackendCommand::Run { ticket }) => ticket,
        other => panic!("expected a Run command, got {other:?}"),
    }
}

/// Run `ticket` against the app's own source and feed the reply back.
async fn complete(app: &mut App, ticket: Ticket) {
    let outcome = app.controller.executor().run(&ticket).await;
    app.handle_backend_event(BackendEvent::Batch { ticket, outcome });
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.update(Action::SearchInput(ch));
    }
}

// ── Startup & browsing ─────────────────────────────────────────

#[tokio::test]
async fn start_loads_first_page() {
    let (mut app, mut rx) = test_app(MockSource::numbered(45));
    app.start();
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.page, 1);
    assert!(app.controller.state().loading);

    complete(&mut app, ticket).await;
    assert_eq!(app.controller.state().displayed_records.len(), 20);
    assert!(app.controller.view().pagination_visible);
}

#[tokio::test]
async fn paging_dispatches_and_resets_cursor() {
    let (mut app, mut rx) = test_app(MockSource::numbered(45));
    app.start();
    let ticket = expect_run(&mut rx);
    complete(&mut app, ticket).await;

    app.update(Action::MoveDown);
    app.update(Action::MoveDown);
    assert_eq!(app.cursor, 2);

    app.update(Action::NextPage);
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.page, 2);
    assert_eq!(app.cursor, 0);

    app.update(Action::PrevPage);
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.page, 1);
    // Already on page 1: nothing to do.
    app.update(Action::PrevPage);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cursor_stops_at_last_card() {
    let (mut app, mut rx) = test_app(MockSource::numbered(2));
    app.start();
    let ticket = expect_run(&mut rx);
    complete(&mut app, ticket).await;
    for _ in 0..5 {
        app.update(Action::MoveDown);
    }
    assert_eq!(app.cursor, 1);
    assert_eq!(app.selected_record().map(|r| r.name.as_str()), Some("mon-2"));
}

#[tokio::test]
async fn stale_batch_does_not_replace_newer_page() {
    let (mut app, mut rx) = test_app(MockSource::numbered(45));
    app.start();
    let first = expect_run(&mut rx);
    app.update(Action::NextPage);
    let second = expect_run(&mut rx);

    // Page 2 lands first, page 1 afterwards.
    complete(&mut app, second).await;
    assert_eq!(app.controller.state().displayed_records[0].name, "mon-21");
    complete(&mut app, first).await;
    assert_eq!(app.controller.state().displayed_records[0].name, "mon-21");
    assert_eq!(app.controller.state().current_page, 2);
    assert!(!app.controller.state().loading);
}

// ── Search ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn typing_commits_after_debounce() {
    let (mut app, mut rx) = test_app(MockSource::with_catalog(&["pikachu", "raichu"]));
    app.update(Action::StartSearch);
    assert_eq!(app.input_mode, InputMode::Search);

    type_text(&mut app, "pika");
    app.poll_debounce(Instant::now());
    assert!(rx.try_recv().is_err(), "nothing commits while typing");

    let wait = app.next_wakeup(Instant::now(), Duration::from_secs(5));
    assert_eq!(wait, Duration::from_millis(500));

    tokio::time::advance(Duration::from_millis(500)).await;
    app.poll_debounce(Instant::now());
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.search_text, "pika");
}

#[test]
fn quit_key_is_text_while_searching() {
    let (mut app, _rx) = test_app(MockSource::numbered(1));
    app.update(Action::StartSearch);
    assert!(!app.update(Action::SearchInput('q')));
    assert_eq!(app.search_input, "q");
    app.update(Action::SearchBackspace);
    assert!(app.search_input.is_empty());
}

#[tokio::test]
async fn enter_commits_immediately() {
    let (mut app, mut rx) = test_app(MockSource::with_catalog(&["pikachu"]));
    app.update(Action::StartSearch);
    type_text(&mut app, "pik");
    app.update(Action::SearchConfirm);
    assert_eq!(app.input_mode, InputMode::Normal);
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.search_text, "pik");
    assert!(app.controller.debounce_deadline().is_none());
}

#[tokio::test]
async fn paging_is_ignored_while_searching() {
    let (mut app, mut rx) = test_app(MockSource::with_catalog(&["pikachu"]));
    app.update(Action::StartSearch);
    type_text(&mut app, "pik");
    app.update(Action::SearchConfirm);
    let ticket = expect_run(&mut rx);
    complete(&mut app, ticket).await;

    app.update(Action::NextPage);
    assert!(rx.try_recv().is_err());
    assert!(!app.controller.view().pagination_visible);
}

#[tokio::test]
async fn esc_on_gallery_clears_search_back_to_page_one() {
    let (mut app, mut rx) = test_app(MockSource::numbered(45));
    app.update(Action::StartSearch);
    type_text(&mut app, "mon-1");
    app.update(Action::SearchConfirm);
    let _ = expect_run(&mut rx);

    app.update(Action::NavigateBack);
    assert!(app.search_input.is_empty());
    let ticket = expect_run(&mut rx);
    assert_eq!(ticket.inputs.search_text, "");
    assert_eq!(ticket.inputs.page, 1);
}

#[tokio::test]
async fn not_found_search_clears_cards() {
    let (mut app, mut rx) = test_app(MockSource::with_catalog(&["pikachu"]));
    app.update(Action::StartSearch);
    type_text(&mut app, "zzzz");
    app.update(Action::SearchConfirm);
    let ticket = expect_run(&mut rx);
    complete(&mut app, ticket).await;
    assert!(app.controller.view().not_found);
    assert!(app.selected_record().is_none());
}

// ── Notices ────────────────────────────────────────────────────

#[test]
fn failure_notice_expires_after_a_few_seconds() {
    let (mut app, mut rx) = test_app(MockSource::numbered(5));
    app.start();
    let ticket = expect_run(&mut rx);
    app.handle_backend_event(BackendEvent::Batch {
        ticket,
        outcome: BatchOutcome::Failed {
            context: pokegallery_core::query::FailureContext::List,
            error: SourceError::Timeout,
        },
    });

    let pinned = app.notice.clone().unwrap();
    assert_eq!(pinned.notice.level, NoticeLevel::Error);
    assert_eq!(pinned.notice.message, "Failed to load Pokémon list");

    for _ in 0..NOTICE_TICKS - 1 {
        app.update(Action::Tick);
    }
    assert!(app.notice.is_some());
    app.update(Action::Tick);
    assert!(app.notice.is_none());
}

// ── Detail screen ──────────────────────────────────────────────

#[tokio::test]
async fn drill_in_requests_detail_and_ignores_old_replies() {
    let (mut app, mut rx) = test_app(MockSource::numbered(3));
    app.start();
    let ticket = expect_run(&mut rx);
    complete(&mut app, ticket).await;

    app.update(Action::DrillIn);
    assert_eq!(app.screen, Screen::Detail);
    let request = match rx.try_recv() {
        Ok(BackendCommand::LoadDetail { request, key }) => {
            assert_eq!(key, pokegallery_core::DetailKey::Name("mon-1".into()));
            request
        }
        other => panic!("expected LoadDetail, got {other:?}"),
    };
    assert!(matches!(app.detail, Some(DetailState::Loading { .. })));

    let record = pokegallery_core::source::mock::mock_record(1, "mon-1");
    let view = Box::new(DetailView::build(&record, None));
    app.handle_backend_event(BackendEvent::Detail {
        request: request - 1,
        result: Ok(view.clone()),
    });
    assert!(matches!(app.detail, Some(DetailState::Loading { .. })));

    app.handle_backend_event(BackendEvent::Detail {
        request,
        result: Ok(view),
    });
    assert!(matches!(app.detail, Some(DetailState::Ready(_))));
}

#[test]
fn tab_cycles_detail_tabs_and_esc_returns() {
    let (mut app, _rx) = test_app(MockSource::numbered(1));
    app.open_detail("mon-1".into());
    assert_eq!(app.detail_tab, DetailTab::Stats);
    app.update(Action::NextTab);
    assert_eq!(app.detail_tab, DetailTab::Details);
    app.update(Action::NextTab);
    app.update(Action::NextTab);
    assert_eq!(app.detail_tab, DetailTab::Stats);

    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Gallery);
    assert!(app.detail.is_none());
}

#[test]
fn detail_failure_sets_error_notice() {
    let (mut app, _rx) = test_app(MockSource::numbered(1));
    app.open_detail("mon-1".into());
    let request = app.detail_request;
    app.handle_backend_event(BackendEvent::Detail {
        request,
        result: Err(DetailError::Failed("500".into())),
    });
    assert_eq!(
        app.detail,
        Some(DetailState::Failed("Failed to fetch Pokémon details".into()))
    );
    assert_eq!(app.notice.unwrap().notice.level, NoticeLevel::Error);
}

// ── Help overlay ───────────────────────────────────────────────

#[test]
fn help_overlay_swallows_navigation() {
    let (mut app, mut rx) = test_app(MockSource::numbered(45));
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::NextPage);
    assert!(rx.try_recv().is_err());
    app.update(Action::NavigateBack);
    assert!(!app.show_help);
    assert!(app.update(Action::Quit));
}
