//! Explicit session state and command dispatch.
//!
//! A [`Session`] owns the loaded namespace and the folder currently being
//! browsed. Front-ends turn user input into [`Command`] values and hand them
//! to [`Session::dispatch`].

mod command;
mod session;

pub use command::{Command, Outcome};
pub use session::Session;
