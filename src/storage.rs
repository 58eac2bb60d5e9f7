//! File-backed task repository
//!
//! The whole repository state lives in one JSON document:
//!
//! ```text
//! {
//!   "next_id": 3,
//!   "tasks": [
//!     { "id": 1, "title": "Buy milk", "is_done": false, "created_at": "...", ... },
//!     { "id": 2, "title": "Write report", ... }
//!   ]
//! }
//! ```
//!
//! Every mutation rewrites the document with [`lock::write_atomic`], so the
//! file on disk is always either the previous or the new state. The
//! in-memory copy is guarded by a single mutex covering both the counter and
//! the task list; a write that fails puts the in-memory state back exactly
//! as it was before the call.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock;
use crate::repo::TaskRepo;
use crate::task::Task;

/// In-memory repository state: the id counter and the ordered task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskState {
    pub next_id: u64,
    pub tasks: Vec<Task>,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

/// On-disk shape as read back; tolerant of a missing counter or task list.
///
/// The counter is kept as a raw number so negative values and the full
/// `u64` range both parse before normalization.
#[derive(Debug, Deserialize)]
struct PersistedState {
    #[serde(default)]
    next_id: Option<serde_json::Number>,
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

impl TryFrom<PersistedState> for TaskState {
    type Error = serde_json::Error;

    fn try_from(raw: PersistedState) -> serde_json::Result<Self> {
        let tasks = raw.tasks.unwrap_or_default();
        let floor = compute_next_id(&tasks).ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom(
                "highest task id leaves no id to assign next",
            )
        })?;
        // A counter at or below an existing id would hand that id out again.
        let next_id = match raw.next_id.as_ref().and_then(serde_json::Number::as_u64) {
            Some(loaded) if loaded >= floor => loaded,
            _ => floor,
        };
        Ok(Self { next_id, tasks })
    }
}

/// One past the highest id in `tasks`, 1 when empty, `None` past `u64::MAX`.
pub fn compute_next_id(tasks: &[Task]) -> Option<u64> {
    tasks
        .iter()
        .map(|task| task.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

impl TaskState {
    pub fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Assign the next id to `task` and append it.
    ///
    /// Leaves the state untouched with [`Error::IdsExhausted`] once the
    /// counter cannot advance.
    pub fn insert(&mut self, mut task: Task) -> Result<Task> {
        let following = self.next_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        task.id = self.next_id;
        self.next_id = following;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Parse a persisted document; empty input yields the default state.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }
        let raw: PersistedState = serde_json::from_slice(data)?;
        raw.try_into()
    }

    /// Serialize as pretty JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');
        Ok(data)
    }
}

/// Task repository persisted to a single JSON file
#[derive(Debug)]
pub struct FileTaskRepo {
    path: PathBuf,
    state: Mutex<TaskState>,
}

impl FileTaskRepo {
    /// Open the repository stored at `path`
    ///
    /// Creates the parent directory if needed. A missing or empty file gives
    /// an empty repository; a file that does not parse is
    /// [`Error::CorruptState`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = match fs::read(&path) {
            Ok(data) => TaskState::from_json(&data).map_err(|source| Error::CorruptState {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => TaskState::default(),
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next successful create will receive
    pub fn next_id(&self) -> Result<u64> {
        Ok(self.lock_state()?.next_id)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, TaskState>> {
        self.state.lock().map_err(|_| Error::StatePoisoned)
    }

    /// Write `state` to disk. Callers hold the state lock and roll back on error.
    fn persist(&self, state: &TaskState) -> Result<()> {
        let data = state.to_json()?;
        lock::write_atomic(&self.path, &data)
    }
}

impl TaskRepo for FileTaskRepo {
    fn create(&self, task: Task) -> Result<Task> {
        let mut state = self.lock_state()?;
        let previous_next_id = state.next_id;

        let created = state.insert(task)?;

        if let Err(err) = self.persist(&state) {
            state.tasks.pop();
            state.next_id = previous_next_id;
            return Err(err);
        }
        Ok(created)
    }

    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.lock_state()?.tasks.clone())
    }

    fn get_by_id(&self, id: u64) -> Result<Task> {
        self.lock_state()?
            .get(id)
            .cloned()
            .ok_or(Error::TaskNotFound(id))
    }

    fn update(&self, task: Task) -> Result<Task> {
        let mut state = self.lock_state()?;
        let idx = state.position(task.id).ok_or(Error::TaskNotFound(task.id))?;

        let previous = std::mem::replace(&mut state.tasks[idx], task.clone());

        if let Err(err) = self.persist(&state) {
            state.tasks[idx] = previous;
            return Err(err);
        }
        Ok(task)
    }

    fn delete(&self, id: u64) -> Result<Task> {
        let mut state = self.lock_state()?;
        let idx = state.position(id).ok_or(Error::TaskNotFound(id))?;

        let removed = state.tasks.remove(idx);

        if let Err(err) = self.persist(&state) {
            state.tasks.insert(idx, removed);
            return Err(err);
        }
        Ok(removed)
    }
}
