//! In-memory task repository, for tests and `serve --memory`.

use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::repo::TaskRepo;
use crate::storage::TaskState;
use crate::task::Task;

#[derive(Debug, Default)]
pub struct MemoryTaskRepo {
    state: Mutex<TaskState>,
}

impl MemoryTaskRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, TaskState>> {
        self.state.lock().map_err(|_| Error::StatePoisoned)
    }
}

impl TaskRepo for MemoryTaskRepo {
    fn create(&self, task: Task) -> Result<Task> {
        self.lock_state()?.insert(task)
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
        state.tasks[idx] = task.clone();
        Ok(task)
    }

    fn delete(&self, id: u64) -> Result<Task> {
        let mut state = self.lock_state()?;
        let idx = state.position(id).ok_or(Error::TaskNotFound(id))?;
        Ok(state.tasks.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let repo = MemoryTaskRepo::new();
        let first = repo.create(Task::new("first", Utc::now())).unwrap();
        let second = repo.create(Task::new("second", Utc::now())).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        repo.delete(2).unwrap();
        let third = repo.create(Task::new("third", Utc::now())).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let repo = MemoryTaskRepo::new();
        assert!(matches!(repo.get_by_id(1), Err(Error::TaskNotFound(1))));
        assert!(matches!(repo.delete(1), Err(Error::TaskNotFound(1))));
        let mut ghost = Task::new("ghost", Utc::now());
        ghost.id = 1;
        assert!(matches!(repo.update(ghost), Err(Error::TaskNotFound(1))));
    }
}
