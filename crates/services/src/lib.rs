#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod context;
pub mod error;
pub mod practice;
pub mod recorder;
pub mod reminder;
pub mod remote;
pub mod sync;
pub mod timer;

pub use practice_core::Clock;

pub use app_services::AppServices;
pub use auth::AuthService;
pub use context::SessionContext;
pub use error::{AppServicesError, PracticeError, RecorderError, ReminderError, RemoteError};
pub use practice::{FEEDBACK_DELAY, Feedback, PracticeController, PracticeLoopService, SubmittedAnswer};
pub use recorder::RecorderService;
pub use reminder::{NotificationSink, PermissionState, ReminderScheduler};
pub use remote::{HttpRemoteStore, Identity, RemoteConfig, RemoteStore};
pub use sync::SyncService;
pub use timer::TimerHandle;
