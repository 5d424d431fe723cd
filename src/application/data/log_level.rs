use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(LogLevel::Debug, LevelFilter::DEBUG)]
    #[case(LogLevel::Warn, LevelFilter::WARN)]
    #[case(LogLevel::Silent, LevelFilter::OFF)]
    fn maps_to_tracing_filter(#[case] level: LogLevel, #[case] expected: LevelFilter) {
        assert_eq!(level.to_level_filter(), expected);
    }

    #[test]
    fn defaults_to_warn() {
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }
}
