//! Small helpers shared by the binary and printers.

use owo_colors::OwoColorize;
use std::path::Path;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// `path` relative to `root` when possible, for stable display.
pub fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path_is_relative_under_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            display_path(Path::new("/work/project/plots/a.json"), root),
            "plots/a.json"
        );
        assert_eq!(display_path(Path::new("/elsewhere/b.json"), root), "/elsewhere/b.json");
    }
}
