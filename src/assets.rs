//! Lookup of the shader, image and model files the lessons read.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Resolves an asset path. Relative paths are tried against the working
/// directory first, then against the crate directory, so lessons can be
/// started with `cargo run` from anywhere in the workspace.
pub fn resolve(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    let in_crate = Path::new(env!("CARGO_MANIFEST_DIR")).join(path);
    if in_crate.exists() {
        in_crate
    } else {
        path.to_path_buf()
    }
}

pub fn load_text_file(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = resolve(path);
    fs::read_to_string(&path).with_context(|| {
        log::error!("failed to open file: {}", path.display());
        format!("failed to open file: {}", path.display())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_relative_paths_are_found() {
        let text = load_text_file("Cargo.toml").unwrap();
        assert!(text.contains("opengl-lessons"));
    }

    #[test]
    fn missing_files_are_errors() {
        let err = load_text_file("shader/does_not_exist.vs").unwrap_err();
        assert!(err.to_string().contains("does_not_exist.vs"));
    }
}
