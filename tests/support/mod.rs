#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tasklist::memory::MemoryTaskRepo;
use tasklist::service::TaskService;
use tasklist::task::Task;
use tempfile::TempDir;

/// Scratch directory holding a task data file.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// `<tmp>/data/tasks.json`; the `data` directory is not created.
    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("data").join("tasks.json")
    }

    pub fn write_data(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.data_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_data(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.data_file()).expect("read data file");
        serde_json::from_str(&raw).expect("data file is JSON")
    }
}

pub fn fixed_time(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap()
}

pub fn new_task(title: &str) -> Task {
    Task::new(title, fixed_time(10))
}

pub fn stored_task(id: u64, title: &str) -> Task {
    let mut task = new_task(title);
    task.id = id;
    task
}

pub fn memory_service() -> TaskService {
    TaskService::new(Arc::new(MemoryTaskRepo::new()))
}

/// Serve `service` on an ephemeral localhost port from a background thread.
pub fn spawn_server(service: TaskService) -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            axum::serve(listener, tasklist::api::router(service))
                .await
                .expect("serve");
        });
    });
    rx.recv().expect("server address")
}
