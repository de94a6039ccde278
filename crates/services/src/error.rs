//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors from the remote store collaborator, tagged by kind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("remote sync is not configured")]
    Disabled,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("insert rejected: {0}")]
    Insert(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Errors emitted by the session recorder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecorderError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the practice controller and workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("feedback for the previous answer is still pending")]
    FeedbackPending,
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the reminder scheduler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReminderError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
}
