use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CopyError>;

/// Errors surfaced to callers of [`copy`](crate::copy::copy).
///
/// Every other mismatch met while mapping is absorbed as a skip.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CopyError {
	/// Destination is not a live reference, so nothing can be written through it.
	#[error("copy destination is unaddressable")]
	DestinationUnaddressable,
}

/// Failure reported by a [`Scanner`](crate::copy::Scanner) collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("scan failed: {reason}")]
pub struct ScanError {
	/// Human-readable reason for the rejection.
	pub reason: String,
}

impl ScanError {
	/// Build a scan error from any displayable reason.
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}
