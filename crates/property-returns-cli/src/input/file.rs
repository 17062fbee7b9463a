use property_returns_core::CalculatorConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file as a generic serde_json::Value.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_contents(&canonical)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load calculator settings from a `.yaml`/`.yml` or JSON file. Missing
/// keys fall back to the defaults, and the result is checked before use.
pub fn read_config(path: &str) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_contents(&canonical)?;
    let config: CalculatorConfig = if is_yaml(&canonical) {
        parse_yaml(&contents)
    } else {
        parse_json(&contents)
    }
    .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;

    config.validate()?;
    log::info!("loaded calculator config from {}", canonical.display());
    Ok(config)
}

fn parse_yaml<T: DeserializeOwned>(contents: &str) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_yaml::from_str(contents)?)
}

fn parse_json<T: DeserializeOwned>(contents: &str) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(contents)?)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_contents(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
