//! Shared output formatting for tasklist CLI commands.

use serde::Serialize;

use crate::error::Result;
use crate::task::Task;

pub const SCHEMA_VERSION: &str = "tasklist.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    lines: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
        }
    }

    pub fn push_line(&mut self, value: impl Into<String>) {
        self.lines.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::with_capacity(output.lines.len() + 1);
    if !output.header.is_empty() {
        lines.push(output.header.clone());
    }
    lines.extend(output.lines.iter().cloned());
    lines.join("\n")
}

/// One-line summary: `3 [x] Buy milk (home) due:2026-01-10`
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.is_done { "x" } else { " " };
    let mut line = format!("{} [{}] {}", task.id, mark, task.title);
    if let Some(category) = task.category.as_deref().filter(|c| !c.is_empty()) {
        line.push_str(&format!(" ({category})"));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due:{}", due.format("%Y-%m-%d")));
    }
    line
}

/// Multi-line detail view used by `tasklist get`.
pub fn format_task_details(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("ID: {}", task.id),
        format!("Title: {}", task.title),
        format!("Done: {}", task.is_done),
    ];
    if let Some(category) = task.category.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("Category: {category}"));
    }
    if let Some(due) = task.due_date {
        lines.push(format!("Due: {}", due.format("%Y-%m-%d")));
    }
    lines.push(format!("CreatedAt: {}", task.created_at.to_rfc3339()));
    if let Some(updated) = task.updated_at {
        lines.push(format!("UpdatedAt: {}", updated.to_rfc3339()));
    }
    lines
}

/// Global flags whose value is a separate argument.
const VALUE_FLAGS: &[&str] = &["--config", "--base-url"];

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if !arg.starts_with('-') {
            return arg;
        }
    }
    "tasklist".to_string()
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "not_found",
        _ => "operation_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Task {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap();
        let mut task = Task::new("Buy milk", now);
        task.id = 3;
        task
    }

    #[test]
    fn task_line_minimal() {
        assert_eq!(format_task_line(&sample()), "3 [ ] Buy milk");
    }

    #[test]
    fn task_line_with_all_fields() {
        let due = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let mut task = sample().with_category("home").with_due_date(due);
        task.is_done = true;
        assert_eq!(format_task_line(&task), "3 [x] Buy milk (home) due:2026-02-01");
    }

    #[test]
    fn empty_category_is_hidden() {
        let task = sample().with_category("");
        assert_eq!(format_task_line(&task), "3 [ ] Buy milk");
        assert!(!format_task_details(&task)
            .iter()
            .any(|line| line.starts_with("Category")));
    }

    #[test]
    fn details_include_timestamps() {
        let lines = format_task_details(&sample());
        assert_eq!(lines[0], "ID: 3");
        assert!(lines.iter().any(|l| l == "CreatedAt: 2026-01-10T09:30:00+00:00"));
        assert!(lines.iter().any(|l| l.starts_with("UpdatedAt: ")));
    }

    #[test]
    fn command_name_skips_flag_values() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            infer_command_name(args(&["--base-url", "http://x", "--json", "get", "1"])),
            "get"
        );
        assert_eq!(infer_command_name(args(&["--config=a.toml", "list"])), "list");
        assert_eq!(infer_command_name(args(&["--json"])), "tasklist");
    }

    #[test]
    fn human_output_joins_lines() {
        let mut human = HumanOutput::new("");
        human.push_line("a");
        human.push_line("b");
        assert_eq!(format_human(&human), "a\nb");
    }
}
