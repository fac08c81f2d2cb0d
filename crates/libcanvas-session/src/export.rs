//! Directory export
//!
//! Writes a session's file mapping to a directory on disk: folder entries
//! become directories, file entries are written with their content.

use std::path::{Component, Path, PathBuf};

use libcanvas_core::{CanvasError, FileKind, ProjectFile};

/// Counters from an export run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    pub files_written: usize,
    pub folders_created: usize,
}

/// Export the file set into `target`, creating it if needed
pub fn export_to_dir(files: &[ProjectFile], target: &Path) -> Result<ExportStats, CanvasError> {
    std::fs::create_dir_all(target)?;

    let mut stats = ExportStats::default();
    for file in files {
        let dest = target.join(relative_path(&file.path)?);
        match file.kind {
            FileKind::Folder => {
                std::fs::create_dir_all(&dest)?;
                stats.folders_created += 1;
            }
            FileKind::File => {
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&dest, &file.content)?;
                stats.files_written += 1;
            }
        }
    }
    Ok(stats)
}

/// Turn a logical path into a relative one that stays inside the target
fn relative_path(path: &str) -> Result<PathBuf, CanvasError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(CanvasError::Validation(
            "file path must not be empty".to_string(),
        ));
    }
    let relative = PathBuf::from(trimmed);
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(CanvasError::Validation(format!(
                    "file path escapes the export directory: {}",
                    path
                )))
            }
        }
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_files_and_folders() {
        let dir = tempdir().unwrap();
        let files = vec![
            ProjectFile::folder("/src"),
            ProjectFile::new("/src/App.js", "export default 1;"),
            ProjectFile::new("/index.js", "import './src/App';"),
        ];

        let stats = export_to_dir(&files, dir.path()).unwrap();
        assert_eq!(
            stats,
            ExportStats {
                files_written: 2,
                folders_created: 1
            }
        );

        let app = std::fs::read_to_string(dir.path().join("src/App.js")).unwrap();
        assert_eq!(app, "export default 1;");
        assert!(dir.path().join("index.js").exists());
    }

    #[test]
    fn test_export_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let files = vec![ProjectFile::new("/deep/nested/mod.js", "x")];
        export_to_dir(&files, dir.path()).unwrap();
        assert!(dir.path().join("deep/nested/mod.js").exists());
    }

    #[test]
    fn test_export_rejects_traversal() {
        let dir = tempdir().unwrap();
        let files = vec![ProjectFile::new("/../evil.js", "x")];
        assert!(matches!(
            export_to_dir(&files, dir.path()),
            Err(CanvasError::Validation(_))
        ));
    }

    #[test]
    fn test_export_into_missing_target_creates_it() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out");
        let files = vec![ProjectFile::new("/a.js", "1")];
        export_to_dir(&files, &target).unwrap();
        assert!(target.join("a.js").exists());
    }
}
