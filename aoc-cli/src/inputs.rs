//! Local puzzle input lookup

use crate::error::InputError;
use std::path::PathBuf;

/// Directory of puzzle inputs, one file per year/day
#[derive(Debug, Clone)]
pub struct InputStore {
    dir: PathBuf,
}

impl InputStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `{dir}/{year}_day{day:02}.txt`
    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        self.dir.join(format!("{}_day{:02}.txt", year, day))
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.path(year, day).is_file()
    }

    /// Read the input for year/day
    pub fn read(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.path(year, day);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => InputError::Missing { path },
            _ => InputError::Io { path, source },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_format() {
        let store = InputStore::new(PathBuf::from("/inputs"));
        assert_eq!(store.path(2025, 4), PathBuf::from("/inputs/2025_day04.txt"));
        assert_eq!(store.path(2025, 12), PathBuf::from("/inputs/2025_day12.txt"));
    }

    #[test]
    fn test_read_existing_input() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("2025_day07.txt"), "..S..\n.....\n").unwrap();

        let store = InputStore::new(dir.path().to_path_buf());
        assert!(store.contains(2025, 7));
        assert_eq!(store.read(2025, 7).unwrap(), "..S..\n.....\n");
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let store = InputStore::new(dir.path().to_path_buf());

        assert!(!store.contains(2025, 8));
        assert!(matches!(store.read(2025, 8), Err(InputError::Missing { .. })));
    }

    #[test]
    fn test_directory_in_place_of_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("2025_day10.txt")).unwrap();

        let store = InputStore::new(dir.path().to_path_buf());
        assert!(!store.contains(2025, 10));
        assert!(matches!(store.read(2025, 10), Err(InputError::Io { .. })));
    }
}
