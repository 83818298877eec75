//! # FURIA Test Framework
//!
//! Scripted collaborators for exercising the auth flows and the recovery
//! workflow without a backend.
//!
//! ```rust,ignore
//! use furia_core::test::mocks::{MockTransport, RecordingHooks};
//!
//! let transport = MockTransport::new();
//! transport.respond("auth/password/forget", 200, serde_json::json!({"message": "sent"}));
//! transport.set_default("auth/email/confirmed", 400, serde_json::json!({"message": "email not activated."}));
//!
//! let hooks = RecordingHooks::new();
//! assert_eq!(hooks.navigation_count(), 0);
//! ```

pub mod mocks;
