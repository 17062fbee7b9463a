pub mod analysis;
pub mod mortgage;
pub mod sample;
pub mod scenarios;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::input;

pub type CommandResult = Result<Value, Box<dyn std::error::Error>>;

/// JSON from `--input <file>` if given, otherwise from piped stdin.
pub fn read_value(path: &Option<String>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(input::file::read_json_value(path)?)),
        None => input::stdin::read_stdin(),
    }
}

/// Typed request from `--input <file>` or piped stdin, if either was given.
pub fn read_request<T: DeserializeOwned>(
    path: &Option<String>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match read_value(path)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
