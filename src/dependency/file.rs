//! File-modification dependency.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::Dependency;

/// Reports a change once the file at `path` has a modification time later
/// than the one observed at construction, or can no longer be read.
///
/// If the file cannot be read when the dependency is created, the current
/// time is recorded instead; a later read failure still counts as a change.
#[derive(Debug, Clone)]
pub struct FileDependency {
    path: PathBuf,
    last_modified: SystemTime,
}

impl FileDependency {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_modified = modified_time(&path).unwrap_or_else(|_| SystemTime::now());
        Self {
            path,
            last_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time recorded when the dependency was created.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

impl Dependency for FileDependency {
    fn has_changed(&self) -> bool {
        match modified_time(&self.path) {
            Ok(modified) => modified > self.last_modified,
            Err(_) => true,
        }
    }
}

fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn unchanged_file_reports_no_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        File::create(&path).unwrap().write_all(b"a = 1").unwrap();

        let dep = FileDependency::new(&path);
        assert_eq!(dep.path(), path.as_path());
        assert!(!dep.has_changed());
    }

    #[test]
    fn newer_modification_time_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        File::create(&path).unwrap().write_all(b"a = 1").unwrap();

        let dep = FileDependency::new(&path);
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(dep.last_modified() + Duration::from_secs(5))
            .unwrap();

        assert!(dep.has_changed());
    }

    #[test]
    fn removed_file_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        File::create(&path).unwrap();

        let dep = FileDependency::new(&path);
        fs::remove_file(&path).unwrap();
        assert!(dep.has_changed());
    }

    #[test]
    fn missing_file_at_construction_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let dep = FileDependency::new(dir.path().join("absent"));
        assert!(dep.has_changed());
    }
}
