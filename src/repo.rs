//! Repository contract shared by the file-backed and in-memory stores.

use crate::error::Result;
use crate::task::Task;

/// Storage for tasks.
///
/// Implementations assign ids on [`create`](TaskRepo::create), keep tasks in
/// insertion order, and report a missing id as
/// [`Error::TaskNotFound`](crate::error::Error::TaskNotFound).
pub trait TaskRepo: Send + Sync {
    /// Store `task` under the next id and return it with that id set.
    fn create(&self, task: Task) -> Result<Task>;

    /// Snapshot of all tasks in insertion order.
    fn list(&self) -> Result<Vec<Task>>;

    fn get_by_id(&self, id: u64) -> Result<Task>;

    /// Replace the stored record whose id matches `task.id`.
    fn update(&self, task: Task) -> Result<Task>;

    /// Remove and return the task with `id`.
    fn delete(&self, id: u64) -> Result<Task>;
}
