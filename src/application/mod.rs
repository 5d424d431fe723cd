mod application;
pub mod data;
mod runtime_config;
mod shell;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
pub use shell::Shell;
