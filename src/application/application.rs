use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use shareplace::config::{Config, ConfigError};
use shareplace::session::Session;
use shareplace::storage::DirectoryStore;
use shareplace::store::TreeStore;

use crate::application::{RuntimeConfig, Shell};

pub struct Application;

impl Application {
    pub fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let config = Config::read(&runtime_config.root).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let storage_directory = config.storage_directory_in(&runtime_config.root);
        info!("Using storage directory {}", storage_directory.display());
        let store = TreeStore::with_key(DirectoryStore::new(storage_directory), config.storage_key);
        let session = Session::open(store);

        colored::control::set_override(runtime_config.color);
        let stdin = io::stdin().lock();
        let stdout = io::stdout().lock();
        Shell::new(session, stdin, stdout, runtime_config.color)
            .run()
            .context(TerminalSnafu)?;

        info!("Session finished");
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Lost the terminal while running the session"))]
    TerminalError { source: io::Error },
}
