use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Opens the operator's editor on a template file and reports whether
/// the content changed. The editor comes from the config file, then
/// VISUAL, then EDITOR; it may carry arguments ("code --wait").
pub fn edit_file(editor: Option<&str>, path: &Path) -> Result<bool> {
    let command = editor
        .map(str::to_string)
        .or_else(|| env::var("VISUAL").ok().filter(|value| !value.trim().is_empty()))
        .or_else(|| env::var("EDITOR").ok().filter(|value| !value.trim().is_empty()))
        .ok_or_else(|| {
            invalid_input(
                "no editor configured; set editor in the config file or the VISUAL/EDITOR environment variable",
            )
        })?;

    let before =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;

    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| invalid_input("editor command is empty"))?;
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("launch editor {command:?}"))?;
    if !status.success() {
        return Err(invalid_input(format!("editor exited with {status}")));
    }

    let after = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(before != after)
}
