use std::path::Path;

use anyhow::{Context, Result};
use clinote_flow::Command;

/// Read a JSON-lines command script. Blank lines and `#` comments are skipped.
pub fn load(path: &Path) -> Result<Vec<(usize, Command)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            let command = serde_json::from_str(line)
                .with_context(|| format!("{}:{n}: invalid command", path.display()))?;
            Ok((n, command))
        })
        .collect()
}
