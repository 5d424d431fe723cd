use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let terminal_supports_color = supports_color::on(supports_color::Stream::Stdout).is_some();
        let color = !cli.no_color && terminal_supports_color;
        Self {
            root: cli.root,
            color,
        }
    }
}
