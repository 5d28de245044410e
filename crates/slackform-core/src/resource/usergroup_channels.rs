// ── slack_usergroup_channels ──
//
// The default channels of a user group. `usergroups.list` is heavily rate
// limited and has no single-group variant, so reads go through the list
// cache and scan the snapshot.

use async_trait::async_trait;
use slackform_api::UserGroup;
use tracing::debug;

use super::{Operation, Resource, ResourceKind, required_str, tolerate};
use crate::context::{Context, Op};
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::Provider;
use crate::schema::{FieldKind, FieldSchema, Schema};

const KIND: ResourceKind = ResourceKind::UserGroupChannels;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserGroupChannels;

/// Declared user group, checked against the persisted identity.
pub(super) fn usergroup_key<'a>(
    kind: ResourceKind,
    op: &Op,
    data: &'a ResourceData,
) -> Result<&'a str, CoreError> {
    let usergroup = required_str(kind, data, "usergroup_id")?;
    if data.exists() && data.id() != usergroup {
        return Err(op.key_immutable(data.id(), usergroup));
    }
    Ok(usergroup)
}

/// Identity for logs and errors: the persisted id, or the declared key
/// before one is assigned.
pub(super) fn op_label(data: &ResourceData) -> &str {
    if data.exists() {
        data.id()
    } else {
        data.get_str("usergroup_id").unwrap_or_default()
    }
}

fn write_observed(data: &mut ResourceData, fallback_id: &str, group: &UserGroup) {
    let id = if group.id.is_empty() { fallback_id } else { &group.id };
    data.set_id(id.to_owned());
    data.set("channels", group.prefs.channels.clone());
}

impl UserGroupChannels {
    async fn write(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
        operation: Operation,
    ) -> Result<(), CoreError> {
        let op = ctx.op(KIND, operation, op_label(data));
        let usergroup = usergroup_key(KIND, &op, data)?.to_owned();
        let channels = data.get_string_list("channels");

        debug!(usergroup, channels = channels.join(","), "updating usergroup channels");
        let group = op
            .call(provider.api().update_usergroup_channels(&usergroup, &channels))
            .await
            .map_err(|e| op.fail(e))?;

        write_observed(data, &usergroup, &group);
        Ok(())
    }
}

#[async_trait]
impl Resource for UserGroupChannels {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldSchema::required("usergroup_id", FieldKind::String, "User group ID"),
            FieldSchema::required(
                "channels",
                FieldKind::StringList,
                "Channel IDs the group is added to by default",
            ),
        ])
    }

    async fn create(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        self.write(provider, ctx, data, Operation::Create).await
    }

    async fn read(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        if !data.exists() {
            return Ok(());
        }
        let op = ctx.op(KIND, Operation::Read, data.id());
        let usergroup = usergroup_key(KIND, &op, data)?.to_owned();

        let groups = provider.usergroups(&op).await.map_err(|e| op.fail(e))?;

        match groups.iter().find(|g| g.id == usergroup) {
            Some(group) => write_observed(data, &usergroup, group),
            None => {
                debug!(usergroup, "usergroup not in list");
                data.clear_id();
            }
        }
        Ok(())
    }

    async fn update(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        self.write(provider, ctx, data, Operation::Update).await
    }

    async fn delete(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        if !data.exists() {
            return Ok(());
        }
        let op = ctx.op(KIND, Operation::Delete, data.id());
        let usergroup = usergroup_key(KIND, &op, data)?.to_owned();

        debug!(usergroup, "clearing usergroup channels");
        tolerate(
            op.call(provider.api().update_usergroup_channels(&usergroup, &[]))
                .await,
            |e| e.is_missing(),
        )
        .map_err(|e| op.fail(e))?;

        data.clear_id();
        Ok(())
    }

    fn seed_from_id(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = data.id().to_owned();
        data.set("usergroup_id", id);
        Ok(())
    }
}
