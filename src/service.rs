//! Task service: validation, timestamps and partial updates over a [`TaskRepo`].

use std::sync::Arc;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::repo::TaskRepo;
use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

/// Domain operations on tasks. Holds no task data of its own.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepo>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepo>) -> Self {
        Self { repo }
    }

    /// Validate `input` and store a new open task.
    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        if input.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        let mut task = Task::new(input.title, Utc::now());
        task.category = input.category;
        task.due_date = input.due_date;

        let created = self.repo.create(task)?;
        tracing::debug!(id = created.id, "task created");
        Ok(created)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.repo.list()
    }

    pub fn get_task(&self, id: u64) -> Result<Task> {
        self.repo.get_by_id(id)
    }

    /// Merge the present fields of `input` into task `id` and bump `updated_at`.
    #[tracing::instrument(skip(self, input))]
    pub fn update_task(&self, id: u64, input: UpdateTaskInput) -> Result<Task> {
        if input.is_empty() {
            return Err(Error::NoUpdateFields);
        }
        if matches!(&input.title, Some(title) if title.trim().is_empty()) {
            return Err(Error::EmptyTitle);
        }

        let mut task = self.repo.get_by_id(id)?;
        input.apply_to(&mut task);
        task.updated_at = Some(Utc::now());

        let updated = self.repo.update(task)?;
        tracing::debug!(id, "task updated");
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_task(&self, id: u64) -> Result<Task> {
        let removed = self.repo.delete(id)?;
        tracing::debug!(id, "task deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTaskRepo;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskRepo::new()))
    }

    fn create(svc: &TaskService, title: &str) -> Task {
        svc.create_task(CreateTaskInput {
            title: title.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn create_rejects_empty_title() {
        let svc = service();
        for title in ["", "   "] {
            let err = svc
                .create_task(CreateTaskInput {
                    title: title.to_string(),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, Error::EmptyTitle));
        }
        assert!(svc.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_stamps_and_assigns_id() {
        let svc = service();
        let task = svc
            .create_task(CreateTaskInput {
                title: "task".to_string(),
                category: Some("work".to_string()),
                due_date: None,
            })
            .unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.category.as_deref(), Some("work"));
        assert!(!task.is_done);
        assert_eq!(task.updated_at, Some(task.created_at));
        assert_eq!(svc.get_task(1).unwrap(), task);
    }

    #[test]
    fn update_merges_fields_and_bumps_timestamp() {
        let svc = service();
        let original = create(&svc, "first");

        let updated = svc
            .update_task(
                1,
                UpdateTaskInput {
                    title: Some("changed".to_string()),
                    category: Some("changed".to_string()),
                    is_done: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "changed");
        assert_eq!(updated.category.as_deref(), Some("changed"));
        assert!(updated.is_done);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(svc.get_task(1).unwrap(), updated);
    }

    #[test]
    fn update_validates_input_before_lookup() {
        let svc = service();
        assert!(matches!(
            svc.update_task(1, UpdateTaskInput::default()),
            Err(Error::NoUpdateFields)
        ));
        assert!(matches!(
            svc.update_task(
                1,
                UpdateTaskInput {
                    title: Some(String::new()),
                    ..Default::default()
                }
            ),
            Err(Error::EmptyTitle)
        ));
        assert!(matches!(
            svc.update_task(
                1,
                UpdateTaskInput {
                    is_done: Some(true),
                    ..Default::default()
                }
            ),
            Err(Error::TaskNotFound(1))
        ));
    }

    #[test]
    fn delete_removes_task() {
        let svc = service();
        create(&svc, "test");

        assert!(matches!(svc.delete_task(2), Err(Error::TaskNotFound(2))));
        assert_eq!(svc.delete_task(1).unwrap().title, "test");
        assert!(matches!(svc.get_task(1), Err(Error::TaskNotFound(1))));
    }
}
