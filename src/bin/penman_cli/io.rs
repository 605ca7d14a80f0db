#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::client::CliError;

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        return read_file(&path).map(Some);
    }
    Ok(val)
}

/// The password file wins over the environment; a trailing newline in the
/// file is not part of the password.
pub fn read_password(env: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    if let Some(path) = file {
        let data = read_file(&path)?;
        return Ok(data.trim_end_matches(['\r', '\n']).to_string());
    }
    env.filter(|value| !value.is_empty())
        .ok_or(CliError::MissingPassword)
}
