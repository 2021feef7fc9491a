//! Console helpers shared by the binary and the printers.

use owo_colors::OwoColorize;
use std::path::Path;

pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "✖ error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "◆ note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn warn_prefix() -> String {
    if use_colors("human") {
        "▲ warn:".yellow().bold().to_string()
    } else {
        "warn:".to_string()
    }
}

/// Path relative to the working directory when possible, for display.
pub fn rel_to_wd(p: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(p, wd))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| p.to_path_buf())
        .to_string_lossy()
        .to_string()
}
