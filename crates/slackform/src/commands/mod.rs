//! Command dispatch: bridges CLI args -> reconcilers -> output formatting.

pub mod cache;
pub mod config_cmd;
pub mod resource;
pub mod resources;
pub mod util;

use std::collections::BTreeMap;

use serde_json::Value;

use slackform_core::{Context, Provider, ResourceKind};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a workspace-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Channel(args) => {
            let mut fields = BTreeMap::new();
            put(&mut fields, "name", args.name);
            put(&mut fields, "topic", args.topic);
            put(&mut fields, "purpose", args.purpose);
            put(&mut fields, "is_archived", args.archived);
            let run = resource::Run::new(ResourceKind::Channel, args.operation, args.state);
            run.execute(provider, ctx, fields, global).await
        }
        Command::ConversationMember(args) => {
            let mut fields = BTreeMap::new();
            put(&mut fields, "conversation_id", args.conversation_id);
            put(&mut fields, "user_id", args.user_id);
            let run =
                resource::Run::new(ResourceKind::ConversationMember, args.operation, args.state);
            run.execute(provider, ctx, fields, global).await
        }
        Command::UsergroupChannels(args) => {
            let mut fields = BTreeMap::new();
            put(&mut fields, "usergroup_id", args.usergroup_id);
            put(&mut fields, "channels", args.channels.map(util::non_empty));
            let run =
                resource::Run::new(ResourceKind::UserGroupChannels, args.operation, args.state);
            run.execute(provider, ctx, fields, global).await
        }
        Command::UsergroupMembers(args) => {
            let mut fields = BTreeMap::new();
            put(&mut fields, "usergroup_id", args.usergroup_id);
            put(&mut fields, "members", args.members.map(util::non_empty));
            let run =
                resource::Run::new(ResourceKind::UserGroupMembers, args.operation, args.state);
            run.execute(provider, ctx, fields, global).await
        }
        Command::Resources(_)
        | Command::Cache(_)
        | Command::Config(_)
        | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a workspace connection".into(),
        )),
    }
}

fn put<T: Into<Value>>(fields: &mut BTreeMap<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        fields.insert(key.to_owned(), value.into());
    }
}
