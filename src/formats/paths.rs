//! File-path list analyzer.
//!
//! Each path is probed on the local filesystem. Failures reading one path
//! or one directory are reported inline and never stop the remaining paths.

use super::group_thousands;
use crate::types::Payload;
use chrono::{DateTime, Local};
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Per-path existence, size, modification time and directory contents.
///
/// Returns `None` for any payload other than a path list.
pub fn analyze(payload: &Payload) -> Option<Vec<String>> {
    let Payload::PathList(paths) = payload else {
        return None;
    };
    Some(describe_paths(paths, count_children))
}

/// Describe each path, counting directory children with `count`.
fn describe_paths<F, E>(paths: &[String], count: F) -> Vec<String>
where
    F: Fn(&Path) -> Result<DirectoryCounts, E>,
    E: Display,
{
    let mut lines = vec![format!("File Count: {}", paths.len())];
    for path in paths {
        lines.push(format!("  File: {path}"));
        describe_path(Path::new(path), &count, &mut lines);
    }
    lines
}

/// Entry counts directly inside a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryCounts {
    /// Non-directory entries
    pub files: usize,
    /// Subdirectories
    pub directories: usize,
}

/// Count the immediate children of `dir`.
///
/// Symbolic links are not followed; a link counts as a file.
pub fn count_children(dir: &Path) -> Result<DirectoryCounts, walkdir::Error> {
    let mut counts = DirectoryCounts::default();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        if entry?.file_type().is_dir() {
            counts.directories += 1;
        } else {
            counts.files += 1;
        }
    }
    Ok(counts)
}

fn describe_path<F, E>(path: &Path, count: &F, lines: &mut Vec<String>)
where
    F: Fn(&Path) -> Result<DirectoryCounts, E>,
    E: Display,
{
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            lines.push("    Status: Path does not exist".to_string());
            return;
        }
        Err(e) => {
            lines.push(format!("    Error reading path: {e}"));
            return;
        }
    };

    if metadata.is_dir() {
        lines.push("    Type: Directory".to_string());
        match count(path) {
            Ok(counts) => lines.push(format!(
                "    Contains: {} files, {} directories",
                counts.files, counts.directories
            )),
            Err(e) => lines.push(format!("    Error reading directory: {e}")),
        }
        return;
    }

    lines.push(format!("    Size: {} bytes", group_thousands(metadata.len())));
    match metadata.modified() {
        Ok(time) => {
            let local: DateTime<Local> = time.into();
            lines.push(format!("    Modified: {}", local.format("%Y-%m-%d %H:%M:%S")));
        }
        Err(e) => lines.push(format!("    Modified: unavailable ({e})")),
    }
    lines.push(format!("    Extension: {}", extension_of(path)));
}

/// Extension with its leading dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;

    fn path_list(paths: &[&Path]) -> Payload {
        Payload::PathList(
            paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        )
    }

    #[test]
    fn test_file_directory_and_missing() {
        let dir = tempfile::tempdir().unwrap();

        let file_path = dir.path().join("report.txt");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(&[b'x'; 1500]).unwrap();
        drop(file);

        let sub = dir.path().join("assets");
        fs::create_dir(&sub).unwrap();
        File::create(sub.join("a.png")).unwrap();
        File::create(sub.join("b.png")).unwrap();
        fs::create_dir(sub.join("nested")).unwrap();

        let missing = dir.path().join("gone.bin");

        let lines = analyze(&path_list(&[&file_path, &sub, &missing])).unwrap();

        assert_eq!(lines[0], "File Count: 3");
        let entries: Vec<_> = lines.iter().filter(|l| l.starts_with("  File: ")).collect();
        assert_eq!(entries.len(), 3);

        assert!(lines.contains(&"    Size: 1,500 bytes".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    Modified: ")));
        assert!(lines.contains(&"    Extension: .txt".to_string()));
        assert!(lines.contains(&"    Type: Directory".to_string()));
        assert!(lines.contains(&"    Contains: 2 files, 1 directories".to_string()));
        assert_eq!(lines.last().unwrap(), "    Status: Path does not exist");
    }

    #[test]
    fn test_directory_error_does_not_stop_later_paths() {
        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        let open = dir.path().join("open");
        fs::create_dir(&locked).unwrap();
        fs::create_dir(&open).unwrap();
        File::create(open.join("a.txt")).unwrap();

        let paths = vec![
            locked.to_string_lossy().into_owned(),
            open.to_string_lossy().into_owned(),
        ];
        let lines = describe_paths(&paths, |p: &Path| {
            if p == locked {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "Access is denied"))
            } else {
                count_children(p).map_err(io::Error::from)
            }
        });

        assert_eq!(
            lines,
            vec![
                "File Count: 2".to_string(),
                format!("  File: {}", locked.display()),
                "    Type: Directory".to_string(),
                "    Error reading directory: Access is denied".to_string(),
                format!("  File: {}", open.display()),
                "    Type: Directory".to_string(),
                "    Contains: 1 files, 0 directories".to_string(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let after = dir.path().join("after.txt");
        File::create(&after).unwrap();

        // Privileged users can still list the directory.
        let readable = fs::read_dir(&locked).is_ok();
        let lines = analyze(&path_list(&[&locked, &after])).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert!(lines
            .iter()
            .any(|l| l.starts_with("    Error reading directory: ")));
        assert!(lines.contains(&format!("  File: {}", after.display())));
        assert!(lines.contains(&"    Extension: .txt".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_error_does_not_stop_later_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        File::create(&file_path).unwrap();
        // A regular file used as a directory component is neither found nor missing.
        let bogus = file_path.join("child");

        let lines = analyze(&path_list(&[&bogus, &file_path])).unwrap();

        assert!(lines[2].starts_with("    Error reading path: "));
        assert_eq!(lines[3], format!("  File: {}", file_path.display()));
        assert_eq!(lines[4], "    Size: 0 bytes");
    }

    #[test]
    fn test_empty_list() {
        let lines = analyze(&Payload::PathList(vec![])).unwrap();
        assert_eq!(lines, vec!["File Count: 0".to_string()]);
    }

    #[test]
    fn test_count_children_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(count_children(dir.path()).unwrap(), DirectoryCounts::default());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
    }

    #[test]
    fn test_non_path_list_declined() {
        assert!(analyze(&Payload::Text("C:\\a.txt".into())).is_none());
    }
}
