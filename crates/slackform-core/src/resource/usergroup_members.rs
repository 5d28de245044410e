// ── slack_usergroup_members ──
//
// The member list of a user group. Slack rejects an empty member list, so
// deleting disables the group instead; create and update re-enable it.

use async_trait::async_trait;
use tracing::debug;

use super::usergroup_channels::{op_label, usergroup_key};
use super::{Operation, Resource, ResourceKind, tolerate};
use crate::context::{Context, Op};
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::Provider;
use crate::remote::AlreadyMet;
use crate::schema::{FieldKind, FieldSchema, Schema};

const KIND: ResourceKind = ResourceKind::UserGroupMembers;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserGroupMembers;

impl UserGroupMembers {
    /// Enable the group, then replace its member list.
    async fn write(
        &self,
        provider: &Provider,
        op: &Op,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let api = provider.api();
        let usergroup = usergroup_key(KIND, op, data)?.to_owned();
        let members = data.get_string_list("members");

        debug!(usergroup, "enabling usergroup");
        tolerate(op.call(api.enable_usergroup(&usergroup)).await, |e| {
            e.is_goal_met(AlreadyMet::AlreadyEnabled)
        })
        .map_err(|e| op.fail(e))?;

        debug!(usergroup, members = members.join(","), "updating usergroup members");
        let group = op
            .call(api.update_usergroup_members(&usergroup, &members))
            .await
            .map_err(|e| op.fail(e))?;

        data.set_id(usergroup);
        data.set("members", group.users);
        Ok(())
    }
}

#[async_trait]
impl Resource for UserGroupMembers {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldSchema::required("usergroup_id", FieldKind::String, "User group ID"),
            FieldSchema::required("members", FieldKind::StringList, "User IDs in the group"),
        ])
    }

    async fn create(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let op = ctx.op(KIND, Operation::Create, op_label(data));
        self.write(provider, &op, data).await
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

        debug!(usergroup, "listing usergroup members");
        match op.call(provider.api().list_usergroup_members(&usergroup)).await {
            Ok(members) => data.set("members", members),
            Err(e) if e.is_missing() => {
                debug!(usergroup, "usergroup no longer exists");
                data.clear_id();
            }
            Err(e) => return Err(op.fail(e)),
        }
        Ok(())
    }

    async fn update(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let op = ctx.op(KIND, Operation::Update, op_label(data));
        self.write(provider, &op, data).await?;
        self.read(provider, ctx, data).await
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

        debug!(usergroup, "disabling usergroup");
        tolerate(op.call(provider.api().disable_usergroup(&usergroup)).await, |e| {
            e.is_goal_met(AlreadyMet::AlreadyDisabled) || e.is_missing()
        })
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
