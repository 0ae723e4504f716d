mod error;
pub use error::JournalError;

mod journal;
pub use journal::RequestLog;
