//! Reconciliation layer between `slackform-api` and the host runtime.
//!
//! This crate owns the idempotent CRUD reconcilers for slackform-managed
//! Slack objects and the list cache that shields rate-limited endpoints:
//!
//! - **[`Resource`]**: One reconciler per resource type ([`Channel`],
//!   [`ConversationMember`], [`UserGroupChannels`], [`UserGroupMembers`]).
//!   Every remote failure is classified once by [`remote::classify`]; each
//!   lifecycle step decides which "already done" codes it swallows.
//!
//! - **[`registry`]**: Static table of reconcilers keyed by type name.
//!   [`registry::invoke`] validates declared state, wraps the call in a
//!   tracing span and honours cancellation.
//!
//! - **[`Provider`]**: Shared handles: the [`SlackApi`] seam (implemented
//!   for `SlackClient`, faked in tests), the [`ListCache`] and its
//!   single-flight guard.
//!
//! - **[`ResourceData`]**: Declared/observed state plus identity, with
//!   prior-snapshot change detection for updates.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod identity;
pub mod provider;
pub mod registry;
pub mod remote;
pub mod resource;
pub mod schema;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::SlackApi;
pub use cache::{FileCache, ListCache, MemoryCache, SingleFlight, USERGROUPS_CACHE_KEY};
pub use config::{CacheLocation, ProviderConfig};
pub use context::Context;
pub use data::ResourceData;
pub use error::CoreError;
pub use identity::MemberIdentity;
pub use provider::Provider;
pub use remote::{AlreadyMet, Missing, RemoteErrorKind};
pub use resource::{
    Channel, ConversationMember, Operation, Resource, ResourceKind, UserGroupChannels,
    UserGroupMembers,
};
pub use schema::{FieldKind, FieldSchema, Presence, Schema};
