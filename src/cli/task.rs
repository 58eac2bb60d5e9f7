//! Task subcommands: list, create, get, update, delete.
//!
//! Each command validates its flags locally, calls the server through
//! [`ApiClient`] and prints either a human summary or the JSON envelope.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{
    emit_success, format_task_details, format_task_line, HumanOutput, OutputOptions,
};
use crate::task::{parse_due_date, CreateTaskInput, UpdateTaskInput};

/// Options for `tasklist create`
pub struct CreateOptions {
    pub title: String,
    pub category: Option<String>,
    pub due: Option<String>,
}

/// Options for `tasklist update`
pub struct UpdateOptions {
    pub id: u64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub done: bool,
    pub undone: bool,
}

#[derive(serde::Serialize)]
struct DeleteReport {
    id: u64,
    deleted: bool,
}

/// Build a client from `--base-url`/`TODO_BASE_URL`, falling back to config.
pub fn connect(base_url: Option<String>, config_path: Option<&Path>) -> Result<ApiClient> {
    let config = Config::resolve(config_path)?;
    let base_url = base_url
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.client.base_url.clone());
    ApiClient::new(base_url, config.client.timeout())
}

pub fn run_list(client: &ApiClient, output: OutputOptions) -> Result<()> {
    let tasks = client.list_tasks()?;

    let mut human = HumanOutput::new("");
    if tasks.is_empty() {
        human.push_line("(no tasks)");
    }
    for task in &tasks {
        human.push_line(format_task_line(task));
    }

    emit_success(output, "list", &tasks, Some(&human))
}

pub fn run_create(client: &ApiClient, options: CreateOptions, output: OutputOptions) -> Result<()> {
    let input = build_create_input(options)?;
    let created = client.create_task(&input)?;

    let human = HumanOutput::new(format!("created task {}: {}", created.id, created.title));
    emit_success(output, "create", &created, Some(&human))
}

pub fn run_get(client: &ApiClient, id: u64, output: OutputOptions) -> Result<()> {
    let task = client.get_task(id)?;

    let mut human = HumanOutput::new("");
    for line in format_task_details(&task) {
        human.push_line(line);
    }
    emit_success(output, "get", &task, Some(&human))
}

pub fn run_update(client: &ApiClient, options: UpdateOptions, output: OutputOptions) -> Result<()> {
    let id = options.id;
    let input = build_update_input(options)?;
    let updated = client.update_task(id, &input)?;

    let human = HumanOutput::new(format!("updated task {}", updated.id));
    emit_success(output, "update", &updated, Some(&human))
}

pub fn run_delete(client: &ApiClient, id: u64, output: OutputOptions) -> Result<()> {
    client.delete_task(id)?;

    let human = HumanOutput::new(format!("deleted task {id}"));
    emit_success(output, "delete", &DeleteReport { id, deleted: true }, Some(&human))
}

fn build_create_input(options: CreateOptions) -> Result<CreateTaskInput> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::InvalidArgument("--title is required".to_string()));
    }

    Ok(CreateTaskInput {
        title,
        category: non_blank(options.category),
        due_date: parse_due_flag(options.due.as_deref())?,
    })
}

fn build_update_input(options: UpdateOptions) -> Result<UpdateTaskInput> {
    if options.done && options.undone {
        return Err(Error::InvalidArgument(
            "use only one of --done or --undone".to_string(),
        ));
    }

    let title = match options.title {
        Some(raw) if raw.trim().is_empty() => {
            return Err(Error::InvalidArgument(
                "--title cannot be empty".to_string(),
            ))
        }
        Some(raw) => Some(raw.trim().to_string()),
        None => None,
    };

    let is_done = match (options.done, options.undone) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let input = UpdateTaskInput {
        title,
        category: non_blank(options.category),
        due_date: parse_due_flag(options.due.as_deref())?,
        is_done,
    };

    if input.is_empty() {
        return Err(Error::InvalidArgument(
            "no update fields provided".to_string(),
        ));
    }
    Ok(input)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_due_flag(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => parse_due_date(value).map(Some).ok_or_else(|| {
            Error::InvalidArgument(format!("invalid --due '{value}' (expected YYYY-MM-DD)"))
        }),
    }
}
