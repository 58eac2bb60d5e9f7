//! Blocking HTTP client for the task API.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

const TASKS_PATH: &str = "/v1/tasks";

/// Client for a running `tasklist serve` instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.send(self.request(Method::GET, TASKS_PATH))
    }

    pub fn create_task(&self, input: &CreateTaskInput) -> Result<Task> {
        self.send(self.request(Method::POST, TASKS_PATH).json(input))
    }

    pub fn get_task(&self, id: u64) -> Result<Task> {
        self.send(self.request(Method::GET, &task_path(id)))
    }

    pub fn update_task(&self, id: u64, input: &UpdateTaskInput) -> Result<Task> {
        self.send(self.request(Method::PATCH, &task_path(id)).json(input))
    }

    pub fn delete_task(&self, id: u64) -> Result<()> {
        let response = self.request(Method::DELETE, &task_path(id)).send()?;
        check_status(response).map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send()?)?;
        Ok(response.json()?)
    }
}

fn task_path(id: u64) -> String {
    format!("{TASKS_PATH}/{id}")
}

/// Turn a non-2xx response into [`Error::Api`], preferring the server's message.
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().unwrap_or_default();
    Err(api_error(status.as_u16(), &raw))
}

fn api_error(status: u16, raw: &str) -> Error {
    let message = match serde_json::from_str::<ApiErrorBody>(raw) {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => format!("http {status}: {}", raw.trim()),
    };
    Error::Api { status, message }
}
