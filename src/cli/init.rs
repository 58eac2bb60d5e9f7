//! tasklist init command implementation
//!
//! Writes a `tasklist.toml` holding the default settings.

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    path: PathBuf,
    overwritten: bool,
}

pub fn run(path: Option<&Path>, force: bool, output: OutputOptions) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };

    let existed = path.exists();
    if existed && !force {
        return Err(Error::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save(&path)?;
    tracing::debug!(path = %path.display(), "wrote default config");

    let mut human = HumanOutput::new(format!("wrote {}", path.display()));
    if existed {
        human.push_line("(previous file overwritten)");
    }

    emit_success(
        output,
        "init",
        &InitReport {
            path,
            overwritten: existed,
        },
        Some(&human),
    )
}
