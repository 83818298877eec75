//! # FURIA Core Library
//!
//! Client core of the FURIA fan app: the backend transport, small persisted
//! client state, the account flows and the password recovery workflow.
//!
//! ## Architecture
//!
//! - **API**: JSON-over-HTTP transport trait and its reqwest client
//! - **Storage**: opaque key-value persistence (memory and JSON file)
//! - **Auth**: login, registration, activation, password reset, profile
//! - **Recovery**: e-mail confirmation polling with a resend cooldown
//! - **Config**: defaults, TOML file and `FURIA_*` environment overrides
//!
//! ## Recovery at a glance
//!
//! ```text
//! Idle ─> Sending ─> Polling ─> Confirmed ─> navigate
//!            │          └────> TimedOut  ─> notify
//!            └──> Failed ───────────────> notify
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod recovery;
pub mod storage;

// Test framework with mocks (only for testing)
#[cfg(any(test, feature = "test-utils"))]
pub mod test;
#[cfg(any(test, feature = "test-utils"))]
pub use test::mocks::{MockTransport, RecordingHooks};

pub use api::{ApiClient, ApiResponse, HttpTransport, TransportError};
pub use auth::{AuthService, Profile};
pub use config::{Config, ConfigLoader};
pub use error::{FuriaError, Result};
pub use recovery::{
    EmailConfirmationWorkflow, Navigator, Notice, NoticeLevel, Notifier, PollStatus,
    RecoveryError, RecoveryPolicy,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
