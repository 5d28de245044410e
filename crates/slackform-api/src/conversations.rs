// conversations.* endpoints
//
// Channel lifecycle (create, rename, topic, purpose, archive) and
// membership (invite, kick, members).

use tracing::{debug, warn};

use crate::client::SlackClient;
use crate::error::Error;
use crate::models::{Conversation, ConversationPayload, MembersPage};

/// Page size for `conversations.members`. Slack caps it at 1000.
const MEMBERS_PAGE_LIMIT: &str = "200";

impl SlackClient {
    /// Create a public channel.
    ///
    /// `POST conversations.create`
    pub async fn create_conversation(&self, name: &str, is_private: bool) -> Result<Conversation, Error> {
        debug!(name, is_private, "creating conversation");
        let is_private = if is_private { "true" } else { "false" };
        let payload: ConversationPayload = self
            .call(
                "conversations.create",
                &[("name", name), ("is_private", is_private)],
            )
            .await?;
        Ok(payload.channel)
    }

    /// Fetch a conversation by ID.
    ///
    /// `POST conversations.info`
    pub async fn get_conversation(&self, channel: &str) -> Result<Conversation, Error> {
        debug!(channel, "fetching conversation");
        let payload: ConversationPayload = self
            .call("conversations.info", &[("channel", channel)])
            .await?;
        Ok(payload.channel)
    }

    /// Rename a conversation.
    ///
    /// `POST conversations.rename`
    pub async fn rename_conversation(&self, channel: &str, name: &str) -> Result<Conversation, Error> {
        debug!(channel, name, "renaming conversation");
        let payload: ConversationPayload = self
            .call("conversations.rename", &[("channel", channel), ("name", name)])
            .await?;
        Ok(payload.channel)
    }

    /// Set the topic of a conversation.
    ///
    /// `POST conversations.setTopic`
    pub async fn set_conversation_topic(&self, channel: &str, topic: &str) -> Result<(), Error> {
        debug!(channel, "setting conversation topic");
        self.call_unit("conversations.setTopic", &[("channel", channel), ("topic", topic)])
            .await
    }

    /// Set the purpose of a conversation.
    ///
    /// `POST conversations.setPurpose`
    pub async fn set_conversation_purpose(&self, channel: &str, purpose: &str) -> Result<(), Error> {
        debug!(channel, "setting conversation purpose");
        self.call_unit(
            "conversations.setPurpose",
            &[("channel", channel), ("purpose", purpose)],
        )
        .await
    }

    /// Archive a conversation. Fails with `already_archived` when it is.
    ///
    /// `POST conversations.archive`
    pub async fn archive_conversation(&self, channel: &str) -> Result<(), Error> {
        debug!(channel, "archiving conversation");
        self.call_unit("conversations.archive", &[("channel", channel)])
            .await
    }

    /// Unarchive a conversation. Fails with `not_archived` when it isn't.
    ///
    /// `POST conversations.unarchive`
    pub async fn unarchive_conversation(&self, channel: &str) -> Result<(), Error> {
        debug!(channel, "unarchiving conversation");
        self.call_unit("conversations.unarchive", &[("channel", channel)])
            .await
    }

    /// Invite users (comma-separated IDs) to a conversation.
    ///
    /// `POST conversations.invite`
    pub async fn invite_to_conversation(&self, channel: &str, users: &str) -> Result<(), Error> {
        debug!(channel, users, "inviting to conversation");
        self.call_unit("conversations.invite", &[("channel", channel), ("users", users)])
            .await
    }

    /// Remove a user from a conversation.
    ///
    /// `POST conversations.kick`
    pub async fn kick_from_conversation(&self, channel: &str, user: &str) -> Result<(), Error> {
        debug!(channel, user, "removing from conversation");
        self.call_unit("conversations.kick", &[("channel", channel), ("user", user)])
            .await
    }

    /// List every member ID of a conversation, following cursors.
    ///
    /// `POST conversations.members` (paginated)
    pub async fn list_conversation_members(&self, channel: &str) -> Result<Vec<String>, Error> {
        let mut members = Vec::new();
        let mut cursor = String::new();

        loop {
            debug!(channel, cursor = %cursor, "listing conversation members");
            let page: MembersPage = {
                let mut form = vec![("channel", channel), ("limit", MEMBERS_PAGE_LIMIT)];
                if !cursor.is_empty() {
                    form.push(("cursor", cursor.as_str()));
                }
                self.call("conversations.members", &form).await?
            };
            members.extend(page.members);

            match page.response_metadata.next() {
                Some(next) if next != cursor => cursor = next.to_owned(),
                Some(next) => {
                    warn!(channel, cursor = %next, "server repeated cursor, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(members)
    }
}
