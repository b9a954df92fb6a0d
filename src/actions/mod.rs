//! Use cases composing the session and timestamp repositories.

pub mod event_page;
pub mod record_event;
pub mod session_history;

pub use event_page::EventPageAction;
pub use record_event::RecordEventAction;
pub use session_history::SessionHistoryAction;
