use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

/// Path of a file under `demos/`.
pub fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}
