//! Command implementations of the session engine.

pub mod archive;
pub mod cat;
pub mod cp;
pub mod grep;
pub mod ls;
pub mod mv;
pub mod rm;
pub mod undo;
