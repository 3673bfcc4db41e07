//! sesh: an interactive file-shell session with POSIX-style commands,
//! a persistent command history, and undo backed by a trash area.
//!
//! The session engine lives here; the binary in `main.rs` wires it to a
//! readline loop and owns all user messaging. Operations validate their
//! targets up front and fail with a specific [`AppError`] kind, never
//! logging or retrying on their own.

pub mod commands;
pub mod error;
pub mod fsutil;
pub mod history;
pub mod session;

pub use commands::archive::ArchiveFormat;
pub use commands::cat::{FileContent, ReadMode};
pub use commands::grep::GrepOptions;
pub use commands::ls::LsOptions;
pub use error::AppError;
pub use history::{HistoryService, UndoEntry};
pub use session::Session;
