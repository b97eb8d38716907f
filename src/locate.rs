//! Locating the CatGt executable on disk.
//!
//! This only answers "where is it"; nothing here ever runs the program.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve an executable name the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returned if it is an existing file.
/// - `./foo`, or a relative path with several components such as `bin/CatGt`:
///   returned if it is an existing file relative to the current directory.
/// - Single component (`CatGt`): each directory of `search_paths` (a `PATH`-style
///   list) is tried in order and the first existing match is returned.
/// - Empty name: `None`.
pub fn find_executable<'a>(search_paths: &OsStr, name: &'a Path) -> Option<Cow<'a, Path>> {
    if name.is_absolute() {
        return existing(name).map(Cow::Borrowed);
    }

    let mut components = name.components();
    let found = match (components.next(), components.next()) {
        (None, _) => None,
        (Some(single), None) => {
            find_in_path(search_paths, single.as_os_str()).map(Cow::Owned)
        }
        _ => existing(name).map(Cow::Borrowed),
    };
    debug!(name = %name.display(), found = ?found, "looked up executable");
    found
}

fn find_in_path(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn existing(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn absolute_existing() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("CatGt");
        File::create(&exe).unwrap();
        let found = find_executable(osstr(""), &exe).expect("absolute path should resolve");
        assert_eq!(found.as_ref(), exe.as_path());
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let path = Path::new("/nonexisting/CatGt");
        assert!(find_executable(osstr("/bin"), path).is_none());
    }

    #[test]
    fn single_component_found_in_search_paths() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(second.path().join("CatGt")).unwrap();

        let search = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_executable(&search, Path::new("CatGt"))
            .expect("expected to find CatGt in the second directory");
        assert_eq!(found.as_ref(), second.path().join("CatGt"));
    }

    #[test]
    fn single_component_prefers_first_match() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(first.path().join("CatGt")).unwrap();
        File::create(second.path().join("CatGt")).unwrap();

        let search = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_executable(&search, Path::new("CatGt")).unwrap();
        assert!(found.as_ref().starts_with(first.path()));
    }

    #[test]
    fn absolute_directory_is_not_an_executable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_executable(osstr(""), dir.path()).is_none());
    }

    #[test]
    fn relative_directory_is_not_an_executable() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin").join("CatGt")).unwrap();
        let cwd_before = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let found = find_executable(osstr(""), Path::new("bin/CatGt")).map(|p| p.into_owned());
        std::env::set_current_dir(&cwd_before).ok();
        assert!(found.is_none());
    }

    #[test]
    fn directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("CatGt")).unwrap();
        let found = find_executable(dir.path().as_os_str(), Path::new("CatGt"));
        assert!(found.is_none());
    }

    #[test]
    fn single_component_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_executable(dir.path().as_os_str(), Path::new("CatGt")).is_none());
    }

    #[test]
    fn empty_name_is_none() {
        assert!(find_executable(osstr("/bin"), Path::new("")).is_none());
    }
}
