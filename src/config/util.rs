//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Absolute paths are used as-is. Relative names are tried in cwd and then
/// in each parent directory until the filesystem root.
///
/// # Example
/// ```text
/// /home/user/site/templates/partials/  ← cwd
/// /home/user/site/xpc.toml             ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `name`.
fn find_upward(start: &Path, name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_upward_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("xpc.toml"), "").unwrap();

        assert_eq!(
            find_upward(&nested, Path::new("xpc.toml")),
            Some(dir.path().join("xpc.toml"))
        );
    }

    #[test]
    fn test_missing_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_config_file(&dir.path().join("nope.toml")), None);
    }
}
