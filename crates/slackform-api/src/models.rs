// Web API response types
//
// Every method wraps its payload in a top-level `{ "ok": bool, "error": ... }`
// object with the payload fields alongside. Fields use `#[serde(default)]`
// liberally because Slack omits fields depending on conversation type and
// token scopes.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// The status part of every Web API response.
///
/// ```json
/// { "ok": false, "error": "already_archived" }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Cursor pagination block returned by list methods.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    /// The cursor for the next page, or `None` when this was the last one.
    /// Slack signals the end with an empty string rather than omitting it.
    pub fn next(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

// ── Conversation ─────────────────────────────────────────────────────

/// Topic or purpose of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPurpose {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub last_set: i64,
}

/// A channel-like conversation from `conversations.*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: TopicPurpose,
    #[serde(default)]
    pub purpose: TopicPurpose,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub is_ext_shared: bool,
    #[serde(default)]
    pub is_org_shared: bool,
    #[serde(default)]
    pub locale: String,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub creator: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationPayload {
    pub channel: Conversation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MembersPage {
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

// ── User groups ──────────────────────────────────────────────────────

/// Default channels and groups of a user group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroupPrefs {
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A user group ("subteam") from `usergroups.*`.
///
/// Serializable because `usergroups.list` results are persisted in the
/// list cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub description: String,
    /// Non-zero when the group is disabled.
    #[serde(default)]
    pub date_delete: i64,
    #[serde(default)]
    pub prefs: UserGroupPrefs,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub user_count: Option<u64>,
}

impl UserGroup {
    pub fn is_enabled(&self) -> bool {
        self.date_delete == 0
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserGroupPayload {
    pub usergroup: UserGroup,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserGroupsPayload {
    #[serde(default)]
    pub usergroups: Vec<UserGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersPayload {
    #[serde(default)]
    pub users: Vec<String>,
}

/// Options for `usergroups.list`.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ListUserGroupsParams {
    pub include_users: bool,
    pub include_count: bool,
    pub include_disabled: bool,
}
