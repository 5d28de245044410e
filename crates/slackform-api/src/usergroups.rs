// usergroups.* endpoints
//
// `usergroups.list` sits in Slack's strictest rate-limit tier; callers
// are expected to cache it (see `slackform-core::cache`).

use tracing::debug;

use crate::client::SlackClient;
use crate::error::Error;
use crate::models::{
    ListUserGroupsParams, UserGroup, UserGroupPayload, UserGroupsPayload, UsersPayload,
};

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl SlackClient {
    /// List the workspace's user groups.
    ///
    /// `POST usergroups.list`
    pub async fn list_usergroups(&self, params: ListUserGroupsParams) -> Result<Vec<UserGroup>, Error> {
        debug!(?params, "listing user groups");
        let payload: UserGroupsPayload = self
            .call(
                "usergroups.list",
                &[
                    ("include_users", flag(params.include_users)),
                    ("include_count", flag(params.include_count)),
                    ("include_disabled", flag(params.include_disabled)),
                ],
            )
            .await?;
        Ok(payload.usergroups)
    }

    /// Replace the default channels of a user group.
    ///
    /// `POST usergroups.update` with `channels` as a comma-separated list.
    /// An empty list clears them.
    pub async fn update_usergroup_channels(
        &self,
        usergroup: &str,
        channels: &[String],
    ) -> Result<UserGroup, Error> {
        let channels = channels.join(",");
        debug!(usergroup, channels = %channels, "updating user group channels");
        let payload: UserGroupPayload = self
            .call(
                "usergroups.update",
                &[("usergroup", usergroup), ("channels", channels.as_str())],
            )
            .await?;
        Ok(payload.usergroup)
    }

    /// Enable a user group. Fails with `already_enabled` when it is.
    ///
    /// `POST usergroups.enable`
    pub async fn enable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        debug!(usergroup, "enabling user group");
        let payload: UserGroupPayload = self
            .call("usergroups.enable", &[("usergroup", usergroup)])
            .await?;
        Ok(payload.usergroup)
    }

    /// Disable a user group.
    ///
    /// `POST usergroups.disable`
    pub async fn disable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        debug!(usergroup, "disabling user group");
        let payload: UserGroupPayload = self
            .call("usergroups.disable", &[("usergroup", usergroup)])
            .await?;
        Ok(payload.usergroup)
    }

    /// List the member IDs of a user group.
    ///
    /// `POST usergroups.users.list`
    pub async fn list_usergroup_members(&self, usergroup: &str) -> Result<Vec<String>, Error> {
        debug!(usergroup, "listing user group members");
        let payload: UsersPayload = self
            .call(
                "usergroups.users.list",
                &[("usergroup", usergroup), ("include_disabled", "true")],
            )
            .await?;
        Ok(payload.users)
    }

    /// Replace the members of a user group.
    ///
    /// `POST usergroups.users.update` with `users` as a comma-separated list.
    pub async fn update_usergroup_members(
        &self,
        usergroup: &str,
        users: &[String],
    ) -> Result<UserGroup, Error> {
        let users = users.join(",");
        debug!(usergroup, users = %users, "updating user group members");
        let payload: UserGroupPayload = self
            .call(
                "usergroups.users.update",
                &[("usergroup", usergroup), ("users", users.as_str())],
            )
            .await?;
        Ok(payload.usergroup)
    }
}
