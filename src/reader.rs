//! Bounded suppression-file reading.
//!
//! This module handles:
//! - Reading suppression files with an upper size bound
//! - Locating the user-level suppressions file

use crate::error::{MuffleError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest suppressions file the reader will load (64 MiB).
pub const MAX_SUPPRESSIONS_FILE_LEN: u64 = 1 << 26;

/// Read a file's full contents, refusing files larger than `max_len` bytes.
pub fn read_to_string_bounded(path: &Path, max_len: u64) -> Result<String> {
	let metadata = fs::metadata(path).map_err(|source| MuffleError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;

	if metadata.len() > max_len {
		return Err(MuffleError::FileTooLarge {
			path: path.to_path_buf(),
			len: metadata.len(),
			limit: max_len,
		});
	}

	fs::read_to_string(path).map_err(|source| MuffleError::FileRead {
		path: path.to_path_buf(),
		source,
	})
}

/// Path of the user-level suppressions file (`~/.muffle.supp`).
pub fn user_suppressions_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(MuffleError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(".muffle.supp"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_read_small_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "race:*foo*").unwrap();
		file.flush().unwrap();

		let text = read_to_string_bounded(file.path(), MAX_SUPPRESSIONS_FILE_LEN).unwrap();
		assert_eq!(text, "race:*foo*\n");
	}

	#[test]
	fn test_read_missing_file() {
		let result = read_to_string_bounded(Path::new("/nonexistent/muffle.supp"), 1024);
		assert!(matches!(result, Err(MuffleError::FileRead { .. })));
	}

	#[test]
	fn test_read_oversized_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "race:*foo*").unwrap();
		file.flush().unwrap();

		let result = read_to_string_bounded(file.path(), 4);
		assert!(matches!(result, Err(MuffleError::FileTooLarge { .. })));
	}

	#[test]
	fn test_user_suppressions_path() {
		let path = user_suppressions_path();
		assert!(path.is_ok());
		assert!(path.unwrap().ends_with(".muffle.supp"));
	}
}
