// ── Remote API seam ──
//
// Reconcilers talk to Slack only through this trait, so tests can swap in
// an in-memory workspace. The production implementation delegates to
// `slackform_api::SlackClient`.

use async_trait::async_trait;
use slackform_api::{Conversation, Error, ListUserGroupsParams, SlackClient, UserGroup};

/// Every remote call the reconcilers make.
#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn create_channel(&self, name: &str) -> Result<Conversation, Error>;
    async fn get_channel(&self, channel: &str) -> Result<Conversation, Error>;
    async fn rename_channel(&self, channel: &str, name: &str) -> Result<Conversation, Error>;
    async fn set_channel_topic(&self, channel: &str, topic: &str) -> Result<(), Error>;
    async fn set_channel_purpose(&self, channel: &str, purpose: &str) -> Result<(), Error>;
    async fn archive_channel(&self, channel: &str) -> Result<(), Error>;
    async fn unarchive_channel(&self, channel: &str) -> Result<(), Error>;

    async fn invite_member(&self, channel: &str, user: &str) -> Result<(), Error>;
    async fn kick_member(&self, channel: &str, user: &str) -> Result<(), Error>;
    async fn list_members(&self, channel: &str) -> Result<Vec<String>, Error>;

    /// All user groups, disabled ones included, without member lists.
    async fn list_usergroups(&self) -> Result<Vec<UserGroup>, Error>;
    async fn update_usergroup_channels(
        &self,
        usergroup: &str,
        channels: &[String],
    ) -> Result<UserGroup, Error>;
    async fn enable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error>;
    async fn disable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error>;
    async fn list_usergroup_members(&self, usergroup: &str) -> Result<Vec<String>, Error>;
    async fn update_usergroup_members(
        &self,
        usergroup: &str,
        users: &[String],
    ) -> Result<UserGroup, Error>;
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn create_channel(&self, name: &str) -> Result<Conversation, Error> {
        SlackClient::create_conversation(self, name, false).await
    }

    async fn get_channel(&self, channel: &str) -> Result<Conversation, Error> {
        SlackClient::get_conversation(self, channel).await
    }

    async fn rename_channel(&self, channel: &str, name: &str) -> Result<Conversation, Error> {
        SlackClient::rename_conversation(self, channel, name).await
    }

    async fn set_channel_topic(&self, channel: &str, topic: &str) -> Result<(), Error> {
        SlackClient::set_conversation_topic(self, channel, topic).await
    }

    async fn set_channel_purpose(&self, channel: &str, purpose: &str) -> Result<(), Error> {
        SlackClient::set_conversation_purpose(self, channel, purpose).await
    }

    async fn archive_channel(&self, channel: &str) -> Result<(), Error> {
        SlackClient::archive_conversation(self, channel).await
    }

    async fn unarchive_channel(&self, channel: &str) -> Result<(), Error> {
        SlackClient::unarchive_conversation(self, channel).await
    }

    async fn invite_member(&self, channel: &str, user: &str) -> Result<(), Error> {
        SlackClient::invite_to_conversation(self, channel, user).await
    }

    async fn kick_member(&self, channel: &str, user: &str) -> Result<(), Error> {
        SlackClient::kick_from_conversation(self, channel, user).await
    }

    async fn list_members(&self, channel: &str) -> Result<Vec<String>, Error> {
        SlackClient::list_conversation_members(self, channel).await
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>, Error> {
        SlackClient::list_usergroups(
            self,
            ListUserGroupsParams {
                include_users: false,
                include_count: false,
                include_disabled: true,
            },
        )
        .await
    }

    async fn update_usergroup_channels(
        &self,
        usergroup: &str,
        channels: &[String],
    ) -> Result<UserGroup, Error> {
        SlackClient::update_usergroup_channels(self, usergroup, channels).await
    }

    async fn enable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        SlackClient::enable_usergroup(self, usergroup).await
    }

    async fn disable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        SlackClient::disable_usergroup(self, usergroup).await
    }

    async fn list_usergroup_members(&self, usergroup: &str) -> Result<Vec<String>, Error> {
        SlackClient::list_usergroup_members(self, usergroup).await
    }

    async fn update_usergroup_members(
        &self,
        usergroup: &str,
        users: &[String],
    ) -> Result<UserGroup, Error> {
        SlackClient::update_usergroup_members(self, usergroup, users).await
    }
}
