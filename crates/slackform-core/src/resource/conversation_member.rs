// ── slack_conversation_member ──
//
// Membership of one user in one conversation. Identity is the compound
// "{conversation_id}-{user_id}"; both keys force replacement, so there is
// nothing to update in place.
//
// Slack has no membership existence check. Read pages through the full
// member list and scans it, so the cost is linear in the channel's size.

use async_trait::async_trait;
use tracing::debug;

use super::{Operation, Resource, ResourceKind, required_str, tolerate};
use crate::context::{Context, Op};
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::identity::MemberIdentity;
use crate::provider::Provider;
use crate::remote::{AlreadyMet, Missing, RemoteErrorKind};
use crate::schema::{FieldKind, FieldSchema, Schema};

const KIND: ResourceKind = ResourceKind::ConversationMember;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationMember;

fn declared(data: &ResourceData) -> Result<MemberIdentity, CoreError> {
    Ok(MemberIdentity::new(
        required_str(KIND, data, "conversation_id")?,
        required_str(KIND, data, "user_id")?,
    ))
}

/// Fail if the declared keys no longer match the persisted identity.
fn verify_key(op: &Op, data: &ResourceData, declared: &MemberIdentity) -> Result<(), CoreError> {
    if !data.exists() {
        return Ok(());
    }
    let persisted: MemberIdentity = data.id().parse()?;
    if persisted != *declared {
        return Err(op.key_immutable(data.id(), &declared.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Resource for ConversationMember {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldSchema::required("conversation_id", FieldKind::String, "Conversation ID")
                .force_new(),
            FieldSchema::required("user_id", FieldKind::String, "User ID to add").force_new(),
        ])
    }

    async fn create(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let member = declared(data)?;
        let id = member.to_string();
        let op = ctx.op(KIND, Operation::Create, &id);

        debug!(
            conversation = member.conversation_id,
            user = member.user_id,
            "inviting conversation member"
        );
        tolerate(
            op.call(
                provider
                    .api()
                    .invite_member(&member.conversation_id, &member.user_id),
            )
            .await,
            |e| e.is_goal_met(AlreadyMet::AlreadyInChannel),
        )
        .map_err(|e| op.fail(e))?;

        data.set_id(id);
        Ok(())
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
        let member = declared(data)?;
        let op = ctx.op(KIND, Operation::Read, data.id());
        verify_key(&op, data, &member)?;

        debug!(conversation = member.conversation_id, "listing conversation members");
        let members = match op
            .call(provider.api().list_members(&member.conversation_id))
            .await
        {
            Ok(members) => members,
            Err(e) if e.kind() == Some(RemoteErrorKind::NotFound(Missing::ChannelNotFound)) => {
                debug!(conversation = member.conversation_id, "conversation no longer exists");
                data.clear_id();
                return Ok(());
            }
            Err(e) => return Err(op.fail(e)),
        };

        if members.iter().any(|m| *m == member.user_id) {
            data.set_id(member.to_string());
        } else {
            debug!(user = member.user_id, "user is not a member");
            data.clear_id();
        }
        Ok(())
    }

    async fn update(
        &self,
        provider: &Provider,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let member = declared(data)?;
        let op = ctx.op(KIND, Operation::Update, data.id());
        verify_key(&op, data, &member)?;
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
        let member = declared(data)?;
        let op = ctx.op(KIND, Operation::Delete, data.id());
        verify_key(&op, data, &member)?;

        debug!(
            conversation = member.conversation_id,
            user = member.user_id,
            "removing conversation member"
        );
        tolerate(
            op.call(
                provider
                    .api()
                    .kick_member(&member.conversation_id, &member.user_id),
            )
            .await,
            |e| e.is_goal_met(AlreadyMet::NotInChannel) || e.is_missing(),
        )
        .map_err(|e| op.fail(e))?;

        data.clear_id();
        Ok(())
    }

    fn seed_from_id(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let member: MemberIdentity = data.id().parse()?;
        data.set("conversation_id", member.conversation_id);
        data.set("user_id", member.user_id);
        Ok(())
    }
}
