//! tasklist serve command implementation
//!
//! Opens the task store, takes the data-file lock and runs the HTTP API on
//! a tokio runtime until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock};
use crate::memory::MemoryTaskRepo;
use crate::repo::TaskRepo;
use crate::service::TaskService;
use crate::storage::FileTaskRepo;

/// Options for `tasklist serve`
pub struct ServeOptions {
    pub addr: Option<String>,
    pub data: Option<PathBuf>,
    pub memory: bool,
}

pub fn run(options: ServeOptions, config: &Config) -> Result<()> {
    let addr = resolve_addr(options.addr.as_deref(), config)?;

    // The data-file lock is held until the server exits.
    let (repo, _data_lock): (Arc<dyn TaskRepo>, Option<FileLock>) = if options.memory {
        tracing::info!("using in-memory task store");
        (Arc::new(MemoryTaskRepo::new()), None)
    } else {
        let data_file = options
            .data
            .unwrap_or_else(|| config.server.data_file.clone());

        let lock_path = lock::lock_path_for(&data_file);
        let guard = FileLock::try_acquire(&lock_path)?
            .ok_or_else(|| Error::LockFailed(lock_path.clone()))?;

        let repo = FileTaskRepo::open(&data_file)?;
        tracing::info!(
            path = %data_file.display(),
            tasks = repo.list()?.len(),
            next_id = repo.next_id()?,
            "opened task store"
        );
        (Arc::new(repo), Some(guard))
    };

    let service = TaskService::new(repo);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        api::serve(listener, service).await
    })
}

fn resolve_addr(flag: Option<&str>, config: &Config) -> Result<SocketAddr> {
    match flag {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("invalid --addr '{raw}'"))),
        None => config.server.socket_addr(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config_addr() {
        let config = Config::default();
        let addr = resolve_addr(Some("127.0.0.1:9999"), &config).unwrap();
        assert_eq!(addr.port(), 9999);
        assert_eq!(resolve_addr(None, &config).unwrap().port(), 8080);
    }

    #[test]
    fn bad_addr_flag_is_user_error() {
        let err = resolve_addr(Some(":8080"), &Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
