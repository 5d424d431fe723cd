use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Browse and edit a persistent virtual folder tree from the terminal
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory holding `shareplace.yaml` and the default storage
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Never colour the listing, even on a capable terminal
    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["shareplace"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.no_color);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "shareplace",
            "--log-level",
            "debug",
            "--root",
            "/tmp/space",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.root, PathBuf::from("/tmp/space"));
        assert!(cli.no_color);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Cli::try_parse_from(["shareplace", "-l", "loud"]).is_err());
    }
}
