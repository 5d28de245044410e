// Compound identity of a conversation membership: "{conversation}-{user}".
//
// Slack IDs are upper-case alphanumerics and never contain '-', so the
// first '-' is an unambiguous separator.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberIdentity {
    pub conversation_id: String,
    pub user_id: String,
}

impl MemberIdentity {
    pub fn new(conversation_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for MemberIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.conversation_id, self.user_id)
    }
}

impl FromStr for MemberIdentity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((conversation, user)) if !conversation.is_empty() && !user.is_empty() => {
                Ok(Self::new(conversation, user))
            }
            _ => Err(CoreError::ValidationFailed {
                resource: "slack_conversation_member".into(),
                message: format!("identity '{s}' is not of the form <conversation_id>-<user_id>"),
            }),
        }
    }
}
