//! # reconcile
//!
//! Reconciliation of declared category values against a remote management
//! API.
//!
//! Given a declared configuration, the [`Reconciler`] creates the category
//! value if absent, updates it in place if the declaration changed, reads it
//! back into canonical form and deletes it on removal. Every operation is
//! idempotent and safe to re-run.
//!
//! ## Core Concepts
//!
//! - **DesiredConfig**: user intent, each field optional so "absent" and
//!   "empty" stay distinct
//! - **projector**: pure translation to the wire request and back into
//!   [`LocalState`]
//! - **Reconciler**: upsert, read and delete through an injected
//!   [`ResourceClient`]
//! - **drift**: per-field comparison of a declaration with read-back state
//!
//! ## Example
//!
//! ```
//! use reconcile::{DesiredConfig, MockClient, Reconciler};
//!
//! let reconciler = Reconciler::new(Box::new(MockClient::new()));
//!
//! let desired = DesiredConfig::new("env", "prod").with_description("production");
//! let mut state = reconciler.upsert(&desired).unwrap();
//! assert_eq!(state.description, "production");
//!
//! reconciler.delete(Some(&state.name), &mut state.id).unwrap();
//! assert!(state.id.is_empty());
//! ```
//!
//! ## Errors
//!
//! Validation failures ([`Error::Validation`]) are raised before any remote
//! call. Everything the client reports comes back unchanged as
//! [`Error::Remote`]; nothing is retried here, and "not found" is not
//! treated differently from other remote failures.

pub mod client;
pub mod drift;
pub mod error;
pub mod projector;
pub mod reconciler;
pub mod types;

pub use client::http::{Credentials, HttpClient};
pub use client::{CallCounts, MockClient, ResourceClient};
pub use drift::{Change, FieldDrift, PlanSummary};
pub use error::{Error, ErrorCategory, RemoteError, RemoteResult, Result};
pub use reconciler::Reconciler;
pub use types::{DesiredConfig, Identifier, LocalState, RemoteRequest, RemoteResource};
