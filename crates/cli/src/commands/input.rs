//! Payload input: a file path or `-` for stdin.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};

use crate::error::CliError;

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open an input for line-by-line reading
pub async fn open_lines(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if is_stdin(path) {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Read a whole input into memory
pub async fn read_all(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read payload from stdin")?;
        return Ok(content);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read payload {}", path.display()))
}

/// Load the blueprint, reporting a missing file distinctly
pub fn load_blueprint(path: &Path) -> Result<contracts::NotifierBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
