use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `text` next to `path` first and swaps it in, so a reader never
/// sees a half-written config.
pub(crate) fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let staged = staging_path(path);
    let result = stage(&staged, text).and_then(|()| swap_into_place(&staged, path));
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn stage(staged: &Path, text: &str) -> io::Result<()> {
    let mut file = File::create(staged)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}

fn swap_into_place(staged: &Path, target: &Path) -> io::Result<()> {
    // Windows refuses to rename over an existing file; elsewhere rename
    // replaces the target in one step.
    #[cfg(windows)]
    match fs::remove_file(target) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => return Err(error),
        _ => {}
    }
    fs::rename(staged, target)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "formation.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn overwrites_existing_file_and_leaves_no_staging_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("formation.json");
        write_text_atomic(&path, "first").expect("first write");
        write_text_atomic(&path, "second").expect("second write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "second");
        assert!(!staging_path(&path).exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_swap_keeps_previous_target() {
        let temp = TempDir::new().expect("tempdir");
        let target = temp.path().join("formation.json");
        fs::create_dir(&target).expect("target dir");
        fs::write(target.join("keep.txt"), "kept").expect("seed");

        assert!(write_text_atomic(&target, "{}").is_err());
        assert_eq!(
            fs::read_to_string(target.join("keep.txt")).expect("still there"),
            "kept"
        );
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn failed_staging_leaves_existing_config_untouched() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("formation.json");
        write_text_atomic(&path, "original").expect("seed");
        fs::create_dir(staging_path(&path)).expect("block staging file");

        assert!(write_text_atomic(&path, "replacement").is_err());
        assert_eq!(fs::read_to_string(&path).expect("read"), "original");
    }

    #[test]
    fn staging_file_sits_beside_target() {
        let path = Path::new("configs").join("party.json");
        assert_eq!(
            staging_path(&path),
            Path::new("configs").join("party.json.tmp")
        );
    }
}
