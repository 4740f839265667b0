use std::path::PathBuf;

/// Library-level structured errors for muffle.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
///
/// Malformed suppression lines and lifecycle violations (loading after the
/// first query, out-of-range rule access, too many categories) do not appear
/// here: those paths panic with a tool-branded diagnostic instead of
/// returning an error.
#[derive(Debug, thiserror::Error)]
pub enum MuffleError {
	#[error("Failed to read suppressions file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Suppressions file too large: {path} ({len} bytes, limit is {limit})")]
	FileTooLarge { path: PathBuf, len: u64, limit: u64 },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using MuffleError.
pub type Result<T> = std::result::Result<T, MuffleError>;
