// ── Resource reconcilers ──
//
// One implementation per managed Slack object. Each lifecycle entry point
// takes the declared state, issues the remote calls in order, applies the
// idempotency policy to every failure and writes observed fields back.

mod channel;
mod conversation_member;
mod usergroup_channels;
mod usergroup_members;

use async_trait::async_trait;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

use crate::context::Context;
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::Provider;
use crate::remote::CallError;
use crate::schema::Schema;

pub use channel::Channel;
pub use conversation_member::ConversationMember;
pub use usergroup_channels::UserGroupChannels;
pub use usergroup_members::UserGroupMembers;

/// Resource type names as the host runtime knows them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum ResourceKind {
    #[serde(rename = "slack_channel")]
    #[strum(serialize = "slack_channel")]
    Channel,
    #[serde(rename = "slack_conversation_member")]
    #[strum(serialize = "slack_conversation_member")]
    ConversationMember,
    #[serde(rename = "slack_usergroup_channels")]
    #[strum(serialize = "slack_usergroup_channels")]
    UserGroupChannels,
    #[serde(rename = "slack_usergroup_members")]
    #[strum(serialize = "slack_usergroup_members")]
    UserGroupMembers,
}

/// Lifecycle entry point, used to tag logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

/// CRUD reconciler for one resource type.
///
/// All entry points mutate `data` in place: the identity is set on create,
/// cleared when the remote object is gone (read) or removed (delete), and
/// computed fields are refreshed from what Slack reports.
#[async_trait]
pub trait Resource: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn schema(&self) -> Schema;

    async fn create(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError>;

    /// Refresh observed state. A missing remote object clears the identity.
    async fn read(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError>;

    /// Apply changed facets one by one, stopping at the first failure, then
    /// read back.
    async fn update(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError>;

    async fn delete(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError>;

    /// Seed the declared key fields from an identity string.
    fn seed_from_id(&self, _data: &mut ResourceData) -> Result<(), CoreError> {
        Ok(())
    }

    /// Adopt an existing remote object by identity.
    async fn import(
        &self,
        provider: &Provider,
        ctx: &Context,
        id: &str,
    ) -> Result<ResourceData, CoreError> {
        let mut data = ResourceData::with_id(id);
        self.seed_from_id(&mut data)?;
        self.read(provider, ctx, &mut data).await?;
        Ok(data)
    }
}

// ── Shared reconciler helpers ────────────────────────────────────────

/// Swallow a failure that `accept` classifies as already satisfied.
///
/// `Ok(None)` means the call failed but the requested end state holds.
fn tolerate<T>(
    res: Result<T, CallError>,
    accept: impl Fn(&CallError) -> bool,
) -> Result<Option<T>, CallError> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(e) if accept(&e) => {
            debug!(kind = ?e.kind(), "remote end state already holds");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn required_str<'a>(
    kind: ResourceKind,
    data: &'a ResourceData,
    key: &str,
) -> Result<&'a str, CoreError> {
    match data.get_str(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::ValidationFailed {
            resource: kind.to_string(),
            message: format!("missing required field '{key}'"),
        }),
    }
}
