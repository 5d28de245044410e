// slackform-api: Async Rust client for the Slack Web API methods slackform reconciles against

pub mod client;
pub mod conversations;
pub mod error;
pub mod models;
pub mod transport;
pub mod usergroups;

pub use client::SlackClient;
pub use error::Error;
pub use models::{Conversation, ListUserGroupsParams, TopicPurpose, UserGroup, UserGroupPrefs};
pub use transport::{DEFAULT_BASE_URL, TransportConfig};
