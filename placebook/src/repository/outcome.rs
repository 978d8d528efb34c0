//! Step outcomes and failure reports.

use std::fmt;

use crate::cache::LocalStoreError;
use crate::remote::RemoteError;

/// Result of one remote or local step inside a repository operation.
#[derive(Debug)]
pub enum StoreOutcome<T> {
    Ok(T),
    RemoteFailed(RemoteError),
    LocalFailed(LocalStoreError),
}

impl<T> StoreOutcome<T> {
    pub fn from_remote(result: Result<T, RemoteError>) -> Self {
        match result {
            Ok(value) => StoreOutcome::Ok(value),
            Err(e) => StoreOutcome::RemoteFailed(e),
        }
    }

    pub fn from_local(result: Result<T, LocalStoreError>) -> Self {
        match result {
            Ok(value) => StoreOutcome::Ok(value),
            Err(e) => StoreOutcome::LocalFailed(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StoreOutcome::Ok(_))
    }

    /// Classifies a failed outcome; `None` for `Ok`.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            StoreOutcome::Ok(_) => None,
            StoreOutcome::RemoteFailed(e) => Some(FailureKind::of_remote(e)),
            StoreOutcome::LocalFailed(_) => Some(FailureKind::LocalStorage),
        }
    }

    /// Human-readable failure detail; `None` for `Ok`.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            StoreOutcome::Ok(_) => None,
            StoreOutcome::RemoteFailed(e) => Some(e.to_string()),
            StoreOutcome::LocalFailed(e) => Some(e.to_string()),
        }
    }
}

/// Repository operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SaveArt,
    GetNearbyArt,
    LoadAll,
    ClearAll,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SaveArt => "save_art",
            Operation::GetNearbyArt => "get_nearby_art",
            Operation::LoadAll => "load_all",
            Operation::ClearAll => "clear_all",
        };
        f.write_str(name)
    }
}

/// Failure classes absorbed by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport error or timeout.
    RemoteUnavailable,
    /// Non-2xx status from the backend.
    RemoteRejected,
    /// Undecodable backend body; handled like `RemoteUnavailable`.
    MalformedResponse,
    /// Local store I/O, quota, or serialization failure.
    LocalStorage,
}

impl FailureKind {
    pub fn of_remote(error: &RemoteError) -> Self {
        match error {
            RemoteError::Unavailable(_) => FailureKind::RemoteUnavailable,
            RemoteError::Rejected { .. } => FailureKind::RemoteRejected,
            RemoteError::Malformed(_) => FailureKind::MalformedResponse,
        }
    }

    /// True when the failure triggered (or would trigger) the local fallback.
    pub fn is_remote(&self) -> bool {
        !matches!(self, FailureKind::LocalStorage)
    }
}

/// Side-channel record of an absorbed failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub operation: Operation,
    pub kind: FailureKind,
    pub detail: String,
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.operation, self.kind, self.detail)
    }
}
