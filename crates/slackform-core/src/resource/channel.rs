// ── slack_channel ──
//
// A public channel. Deleting archives it; Slack has no hard delete for
// bot tokens. Facets (name, topic, purpose, archive flag) are updated with
// one call each.

use async_trait::async_trait;
use serde_json::json;
use slackform_api::Conversation;
use tracing::debug;

use super::{Operation, Resource, ResourceKind, required_str, tolerate};
use crate::api::SlackApi;
use crate::context::{Context, Op};
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::Provider;
use crate::remote::AlreadyMet;
use crate::schema::{FieldKind, FieldSchema, Schema};

const KIND: ResourceKind = ResourceKind::Channel;

const DEPRECATION: &str = "Slack has deprecated the legacy channel APIs; \
    manage the channel as a conversation with is_private = false instead";

#[derive(Debug, Clone, Copy, Default)]
pub struct Channel;

fn write_observed(data: &mut ResourceData, channel: &Conversation) {
    data.set_id(channel.id.clone());
    data.set("name", channel.name.clone());
    data.set("topic", channel.topic.value.clone());
    data.set("purpose", channel.purpose.value.clone());
    data.set("is_archived", channel.is_archived);
    data.set("is_shared", channel.is_shared);
    data.set("is_ext_shared", channel.is_ext_shared);
    data.set("is_org_shared", channel.is_org_shared);
    data.set("locale", channel.locale.clone());
    data.set("created", channel.created);
    data.set("creator", channel.creator.clone());
}

/// Move the channel into the requested archive state.
async fn set_archived(
    op: &Op,
    api: &dyn SlackApi,
    channel: &str,
    archived: bool,
) -> Result<(), CoreError> {
    let res = if archived {
        debug!(channel, "archiving channel");
        tolerate(op.call(api.archive_channel(channel)).await, |e| {
            e.is_goal_met(AlreadyMet::AlreadyArchived)
        })
    } else {
        debug!(channel, "unarchiving channel");
        tolerate(op.call(api.unarchive_channel(channel)).await, |e| {
            e.is_goal_met(AlreadyMet::NotArchived)
        })
    };
    res.map(drop).map_err(|e| op.fail(e))
}

fn missing_identity(operation: Operation) -> CoreError {
    CoreError::ValidationFailed {
        resource: KIND.to_string(),
        message: format!("cannot {operation} a channel without an identity"),
    }
}

#[async_trait]
impl Resource for Channel {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldSchema::required("name", FieldKind::String, "Channel name, without '#'"),
            FieldSchema::optional("topic", FieldKind::String, "Channel topic"),
            FieldSchema::optional("purpose", FieldKind::String, "Channel purpose"),
            FieldSchema::optional("is_archived", FieldKind::Bool, "Whether the channel is archived")
                .with_default(json!(false)),
            FieldSchema::computed("is_shared", FieldKind::Bool, "Shared with another workspace"),
            FieldSchema::computed("is_ext_shared", FieldKind::Bool, "Shared with an external organization"),
            FieldSchema::computed("is_org_shared", FieldKind::Bool, "Shared across an Enterprise Grid org"),
            FieldSchema::computed("locale", FieldKind::String, "Channel locale"),
            FieldSchema::computed("created", FieldKind::Int, "Creation time (unix seconds)"),
            FieldSchema::computed("creator", FieldKind::String, "User ID of the creator"),
        ])
        .deprecated(DEPRECATION)
    }

    async fn create(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let api = provider.api();
        let name = required_str(KIND, data, "name")?.to_owned();
        let topic = data.get_str("topic").filter(|t| !t.is_empty()).map(str::to_owned);
        let purpose = data.get_str("purpose").filter(|p| !p.is_empty()).map(str::to_owned);
        let archived = data.get_bool("is_archived").unwrap_or(false);

        let mut op = ctx.op(KIND, Operation::Create, &name);
        debug!(name, "creating channel");
        let channel = op
            .call(api.create_channel(&name))
            .await
            .map_err(|e| op.fail(e))?;
        op.set_id(&channel.id);
        data.set_id(channel.id.clone());

        if let Some(topic) = topic {
            op.call(api.set_channel_topic(&channel.id, &topic))
                .await
                .map_err(|e| op.fail(e))?;
        }
        if let Some(purpose) = purpose {
            op.call(api.set_channel_purpose(&channel.id, &purpose))
                .await
                .map_err(|e| op.fail(e))?;
        }
        if archived {
            set_archived(&op, api, &channel.id, true).await?;
        }

        self.read(provider, ctx, data).await
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
        let id = data.id().to_owned();
        let op = ctx.op(KIND, Operation::Read, &id);

        debug!(channel = id, "reading channel");
        match op.call(provider.api().get_channel(&id)).await {
            Ok(channel) => write_observed(data, &channel),
            Err(e) if e.is_missing() => {
                debug!(channel = id, "channel no longer exists");
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
        if !data.exists() {
            return Err(missing_identity(Operation::Update));
        }
        let api = provider.api();
        let id = data.id().to_owned();
        let op = ctx.op(KIND, Operation::Update, &id);

        let archive_to = data
            .has_change("is_archived")
            .then(|| data.get_bool("is_archived").unwrap_or(false));

        // An archived channel rejects every other mutation.
        if archive_to == Some(false) {
            set_archived(&op, api, &id, false).await?;
        }

        if data.has_change("name") {
            let name = required_str(KIND, data, "name")?.to_owned();
            debug!(channel = id, name, "renaming channel");
            op.call(api.rename_channel(&id, &name))
                .await
                .map_err(|e| op.fail(e))?;
        }
        if data.has_change("topic") {
            let topic = data.get_str("topic").unwrap_or_default().to_owned();
            op.call(api.set_channel_topic(&id, &topic))
                .await
                .map_err(|e| op.fail(e))?;
        }
        if data.has_change("purpose") {
            let purpose = data.get_str("purpose").unwrap_or_default().to_owned();
            op.call(api.set_channel_purpose(&id, &purpose))
                .await
                .map_err(|e| op.fail(e))?;
        }

        if archive_to == Some(true) {
            set_archived(&op, api, &id, true).await?;
        }

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
        let id = data.id().to_owned();
        let op = ctx.op(KIND, Operation::Delete, &id);

        debug!(channel = id, "archiving channel for delete");
        tolerate(op.call(provider.api().archive_channel(&id)).await, |e| {
            e.is_goal_met(AlreadyMet::AlreadyArchived) || e.is_missing()
        })
        .map_err(|e| op.fail(e))?;

        data.clear_id();
        Ok(())
    }
}
