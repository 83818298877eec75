use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use furia_core::{ApiClient, AuthService, Config, ConfigLoader, FileStore};

/// Everything a command needs, built once from configuration
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub transport: Arc<ApiClient>,
    pub store: Arc<FileStore>,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let loader = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                ConfigLoader::with_path(path)
            }
            None => ConfigLoader::new(),
        };

        let config = loader.load().context("Failed to load configuration")?;
        let transport = Arc::new(ApiClient::new(&config.api)?);
        let store = Arc::new(FileStore::new(&config.storage.path));

        Ok(Self {
            config_path: loader.config_path().to_path_buf(),
            config,
            transport,
            store,
        })
    }

    /// Auth service with any persisted session already installed
    pub async fn auth(&self) -> Result<AuthService> {
        let auth = AuthService::new(self.transport.clone(), self.store.clone());
        auth.restore_session().await?;
        Ok(auth)
    }
}
