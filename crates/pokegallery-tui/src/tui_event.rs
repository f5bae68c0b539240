use pokegallery_core::{BatchOutcome, DetailKey, DetailView, Ticket};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// Run a listing/search batch.
    Run { ticket: Ticket },
    /// Load the detail view for one record. `request` tags the reply.
    LoadDetail { request: u64, key: DetailKey },
}

/// Events flowing from the backend tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A batch finished; the ticket is echoed back for the stale check.
    Batch {
        ticket: Ticket,
        outcome: BatchOutcome,
    },
    /// A detail load finished.
    Detail {
        request: u64,
        result: Result<Box<DetailView>, DetailError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailError {
    NotFound(String),
    Failed(String),
}
