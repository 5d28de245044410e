// ── Resource registry ──
//
// Static table of reconcilers, keyed by resource type name. Whatever plays
// the host runtime (the CLI, tests) looks a reconciler up here and drives
// it through `invoke`, which adds validation, tracing and cancellation.

use tracing::{Instrument, info, info_span};

use crate::context::Context;
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::Provider;
use crate::resource::{
    Channel, ConversationMember, Operation, Resource, ResourceKind, UserGroupChannels,
    UserGroupMembers,
};

static CHANNEL: Channel = Channel;
static CONVERSATION_MEMBER: ConversationMember = ConversationMember;
static USERGROUP_CHANNELS: UserGroupChannels = UserGroupChannels;
static USERGROUP_MEMBERS: UserGroupMembers = UserGroupMembers;

static RESOURCES: [&(dyn Resource + 'static); 4] = [
    &CHANNEL,
    &CONVERSATION_MEMBER,
    &USERGROUP_CHANNELS,
    &USERGROUP_MEMBERS,
];

/// Every registered reconciler.
pub fn all() -> &'static [&'static dyn Resource] {
    &RESOURCES
}

/// Reconciler for a resource type name such as `slack_channel`.
pub fn lookup(name: &str) -> Result<&'static dyn Resource, CoreError> {
    name.parse::<ResourceKind>()
        .map(get)
        .map_err(|_| CoreError::UnknownResource {
            name: name.to_owned(),
        })
}

pub fn get(kind: ResourceKind) -> &'static dyn Resource {
    match kind {
        ResourceKind::Channel => &CHANNEL,
        ResourceKind::ConversationMember => &CONVERSATION_MEMBER,
        ResourceKind::UserGroupChannels => &USERGROUP_CHANNELS,
        ResourceKind::UserGroupMembers => &USERGROUP_MEMBERS,
    }
}

/// Run one lifecycle operation the way the host runtime would.
///
/// Declared state is validated and defaulted before create and update. For
/// `Import`, `data.id` is the identity to adopt and `data` is replaced with
/// what was read.
pub async fn invoke(
    provider: &Provider,
    ctx: &Context,
    kind: ResourceKind,
    operation: Operation,
    data: &mut ResourceData,
) -> Result<(), CoreError> {
    let resource = get(kind);
    let span = info_span!("resource", resource = %kind, operation = %operation, id = %data.id());

    async {
        ctx.op(kind, operation, data.id()).check_cancelled()?;

        if matches!(operation, Operation::Create | Operation::Update) {
            let schema = resource.schema();
            schema.validate(kind.into(), data)?;
            schema.apply_defaults(data);
        }

        match operation {
            Operation::Create => resource.create(provider, ctx, data).await?,
            Operation::Read => resource.read(provider, ctx, data).await?,
            Operation::Update => resource.update(provider, ctx, data).await?,
            Operation::Delete => resource.delete(provider, ctx, data).await?,
            Operation::Import => {
                let id = data.id().to_owned();
                *data = resource.import(provider, ctx, &id).await?;
            }
        }

        info!(id = %data.id(), exists = data.exists(), "{kind} {operation} complete");
        Ok(())
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_kind_is_registered_under_its_name() {
        for kind in ResourceKind::iter() {
            let resource = lookup(&kind.to_string()).ok().map(|r| r.kind());
            assert_eq!(resource, Some(kind));
        }
        assert_eq!(all().len(), ResourceKind::iter().count());
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            lookup("slack_emoji"),
            Err(CoreError::UnknownResource { .. })
        ));
    }

    #[test]
    fn only_channel_is_deprecated() {
        for resource in all() {
            let deprecated = resource.schema().deprecation_message.is_some();
            assert_eq!(deprecated, resource.kind() == ResourceKind::Channel);
        }
    }
}
