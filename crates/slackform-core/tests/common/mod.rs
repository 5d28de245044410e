#![allow(clippy::unwrap_used, dead_code)]
// In-memory Slack workspace behind the `SlackApi` seam.
//
// Mirrors how the Web API answers repeated mutations (already_archived,
// already_in_channel, ...) so reconcilers can be driven end to end without
// HTTP. Every call is logged; failures can be injected per method.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slackform_api::{Conversation, Error, UserGroup, UserGroupPrefs};
use slackform_core::{MemoryCache, Provider, SlackApi};

const MUTATIONS: &[&str] = &[
    "conversations.create",
    "conversations.rename",
    "conversations.setTopic",
    "conversations.setPurpose",
    "conversations.archive",
    "conversations.unarchive",
    "conversations.invite",
    "conversations.kick",
    "usergroups.update",
    "usergroups.enable",
    "usergroups.disable",
    "usergroups.users.update",
];

#[derive(Default)]
struct Workspace {
    channels: BTreeMap<String, Conversation>,
    members: BTreeMap<String, Vec<String>>,
    usergroups: BTreeMap<String, UserGroup>,
    calls: Vec<String>,
    injected: HashMap<&'static str, Injected>,
    stalled: HashSet<&'static str>,
    next_channel: u32,
}

enum Injected {
    Code(String),
    RateLimited(u64),
}

#[derive(Default)]
pub struct FakeSlack {
    ws: Mutex<Workspace>,
}

fn slack_err(method: &str, code: &str) -> Error {
    Error::Slack {
        method: method.to_owned(),
        code: code.to_owned(),
    }
}

impl FakeSlack {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ── Seeding ──────────────────────────────────────────────────────

    pub fn add_channel(&self, id: &str, name: &str) {
        let mut ws = self.ws.lock().unwrap();
        ws.channels.insert(
            id.to_owned(),
            Conversation {
                id: id.to_owned(),
                name: name.to_owned(),
                created: 1_700_000_000,
                creator: "UCREATOR".to_owned(),
                ..Conversation::default()
            },
        );
        ws.members.entry(id.to_owned()).or_default();
    }

    pub fn set_members(&self, channel: &str, users: &[&str]) {
        let mut ws = self.ws.lock().unwrap();
        ws.members.insert(
            channel.to_owned(),
            users.iter().map(|u| (*u).to_owned()).collect(),
        );
    }

    pub fn add_usergroup(&self, id: &str, users: &[&str], channels: &[&str]) {
        let mut ws = self.ws.lock().unwrap();
        ws.usergroups.insert(
            id.to_owned(),
            UserGroup {
                id: id.to_owned(),
                team_id: "T1".to_owned(),
                handle: id.to_lowercase(),
                users: users.iter().map(|u| (*u).to_owned()).collect(),
                prefs: UserGroupPrefs {
                    channels: channels.iter().map(|c| (*c).to_owned()).collect(),
                    groups: Vec::new(),
                },
                ..UserGroup::default()
            },
        );
    }

    pub fn mark_archived(&self, id: &str) {
        if let Some(c) = self.ws.lock().unwrap().channels.get_mut(id) {
            c.is_archived = true;
        }
    }

    pub fn remove_usergroup(&self, id: &str) {
        self.ws.lock().unwrap().usergroups.remove(id);
    }

    pub fn remove_channel(&self, id: &str) {
        let mut ws = self.ws.lock().unwrap();
        ws.channels.remove(id);
        ws.members.remove(id);
    }

    /// Make the next call to `method` fail with `code`.
    pub fn fail_next(&self, method: &'static str, code: &str) {
        self.ws
            .lock()
            .unwrap()
            .injected
            .insert(method, Injected::Code(code.to_owned()));
    }

    /// Make the next call to `method` answer HTTP 429.
    pub fn rate_limit_next(&self, method: &'static str, retry_after_secs: u64) {
        self.ws
            .lock()
            .unwrap()
            .injected
            .insert(method, Injected::RateLimited(retry_after_secs));
    }

    /// Make every call to `method` hang until cancelled.
    pub fn stall(&self, method: &'static str) {
        self.ws.lock().unwrap().stalled.insert(method);
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn channel(&self, id: &str) -> Option<Conversation> {
        self.ws.lock().unwrap().channels.get(id).cloned()
    }

    pub fn members(&self, channel: &str) -> Vec<String> {
        self.ws
            .lock()
            .unwrap()
            .members
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    pub fn usergroup(&self, id: &str) -> Option<UserGroup> {
        self.ws.lock().unwrap().usergroups.get(id).cloned()
    }

    /// Every call so far, as "method arg,arg".
    pub fn calls(&self) -> Vec<String> {
        self.ws.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    /// Calls that would have changed remote state.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| MUTATIONS.iter().any(|m| c.split(' ').next() == Some(*m)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.ws.lock().unwrap().calls.clear();
    }

    // ── Call plumbing ────────────────────────────────────────────────

    /// Log the call, then apply any injected failure or stall.
    async fn enter(&self, method: &'static str, args: &[&str]) -> Result<(), Error> {
        let (injected, stalled) = {
            let mut ws = self.ws.lock().unwrap();
            ws.calls.push(format!("{method} {}", args.join(",")));
            (ws.injected.remove(method), ws.stalled.contains(method))
        };
        if stalled {
            std::future::pending::<()>().await;
        }
        match injected {
            Some(Injected::Code(code)) => Err(slack_err(method, &code)),
            Some(Injected::RateLimited(retry_after_secs)) => {
                Err(Error::RateLimited { retry_after_secs })
            }
            None => Ok(()),
        }
    }

    fn with_channel<T>(
        &self,
        method: &str,
        id: &str,
        f: impl FnOnce(&mut Conversation, &mut Vec<String>) -> Result<T, &'static str>,
    ) -> Result<T, Error> {
        let mut ws = self.ws.lock().unwrap();
        let Workspace {
            channels, members, ..
        } = &mut *ws;
        let channel = channels
            .get_mut(id)
            .ok_or_else(|| slack_err(method, "channel_not_found"))?;
        let list = members.entry(id.to_owned()).or_default();
        f(channel, list).map_err(|code| slack_err(method, code))
    }

    fn with_group<T>(
        &self,
        method: &str,
        id: &str,
        f: impl FnOnce(&mut UserGroup) -> Result<T, &'static str>,
    ) -> Result<T, Error> {
        let mut ws = self.ws.lock().unwrap();
        let group = ws
            .usergroups
            .get_mut(id)
            .ok_or_else(|| slack_err(method, "no_such_subteam"))?;
        f(group).map_err(|code| slack_err(method, code))
    }
}

fn live(channel: &Conversation) -> Result<(), &'static str> {
    if channel.is_archived {
        Err("is_archived")
    } else {
        Ok(())
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn create_channel(&self, name: &str) -> Result<Conversation, Error> {
        const METHOD: &str = "conversations.create";
        self.enter(METHOD, &[name]).await?;
        let mut ws = self.ws.lock().unwrap();
        if ws.channels.values().any(|c| c.name == name) {
            return Err(slack_err(METHOD, "name_taken"));
        }
        ws.next_channel += 1;
        let id = format!("CNEW{}", ws.next_channel);
        let channel = Conversation {
            id: id.clone(),
            name: name.to_owned(),
            created: 1_700_000_000,
            creator: "UBOT".to_owned(),
            ..Conversation::default()
        };
        ws.channels.insert(id.clone(), channel.clone());
        ws.members.insert(id, vec!["UBOT".to_owned()]);
        Ok(channel)
    }

    async fn get_channel(&self, channel: &str) -> Result<Conversation, Error> {
        const METHOD: &str = "conversations.info";
        self.enter(METHOD, &[channel]).await?;
        self.with_channel(METHOD, channel, |c, _| Ok(c.clone()))
    }

    async fn rename_channel(&self, channel: &str, name: &str) -> Result<Conversation, Error> {
        const METHOD: &str = "conversations.rename";
        self.enter(METHOD, &[channel, name]).await?;
        self.with_channel(METHOD, channel, |c, _| {
            live(c)?;
            name.clone_into(&mut c.name);
            Ok(c.clone())
        })
    }

    async fn set_channel_topic(&self, channel: &str, topic: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.setTopic";
        self.enter(METHOD, &[channel, topic]).await?;
        self.with_channel(METHOD, channel, |c, _| {
            live(c)?;
            topic.clone_into(&mut c.topic.value);
            Ok(())
        })
    }

    async fn set_channel_purpose(&self, channel: &str, purpose: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.setPurpose";
        self.enter(METHOD, &[channel, purpose]).await?;
        self.with_channel(METHOD, channel, |c, _| {
            live(c)?;
            purpose.clone_into(&mut c.purpose.value);
            Ok(())
        })
    }

    async fn archive_channel(&self, channel: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.archive";
        self.enter(METHOD, &[channel]).await?;
        self.with_channel(METHOD, channel, |c, _| {
            if c.is_archived {
                return Err("already_archived");
            }
            c.is_archived = true;
            Ok(())
        })
    }

    async fn unarchive_channel(&self, channel: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.unarchive";
        self.enter(METHOD, &[channel]).await?;
        self.with_channel(METHOD, channel, |c, _| {
            if !c.is_archived {
                return Err("not_archived");
            }
            c.is_archived = false;
            Ok(())
        })
    }

    async fn invite_member(&self, channel: &str, user: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.invite";
        self.enter(METHOD, &[channel, user]).await?;
        self.with_channel(METHOD, channel, |c, members| {
            live(c)?;
            if members.iter().any(|m| m == user) {
                return Err("already_in_channel");
            }
            members.push(user.to_owned());
            Ok(())
        })
    }

    async fn kick_member(&self, channel: &str, user: &str) -> Result<(), Error> {
        const METHOD: &str = "conversations.kick";
        self.enter(METHOD, &[channel, user]).await?;
        self.with_channel(METHOD, channel, |_, members| {
            let before = members.len();
            members.retain(|m| m != user);
            if members.len() == before {
                return Err("not_in_channel");
            }
            Ok(())
        })
    }

    async fn list_members(&self, channel: &str) -> Result<Vec<String>, Error> {
        const METHOD: &str = "conversations.members";
        self.enter(METHOD, &[channel]).await?;
        self.with_channel(METHOD, channel, |_, members| Ok(members.clone()))
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>, Error> {
        self.enter("usergroups.list", &[]).await?;
        let ws = self.ws.lock().unwrap();
        Ok(ws
            .usergroups
            .values()
            .map(|g| UserGroup {
                users: Vec::new(),
                ..g.clone()
            })
            .collect())
    }

    async fn update_usergroup_channels(
        &self,
        usergroup: &str,
        channels: &[String],
    ) -> Result<UserGroup, Error> {
        const METHOD: &str = "usergroups.update";
        self.enter(METHOD, &[usergroup, channels.join(",").as_str()]).await?;
        self.with_group(METHOD, usergroup, |g| {
            g.prefs.channels = channels.to_vec();
            Ok(g.clone())
        })
    }

    async fn enable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        const METHOD: &str = "usergroups.enable";
        self.enter(METHOD, &[usergroup]).await?;
        self.with_group(METHOD, usergroup, |g| {
            if g.is_enabled() {
                return Err("already_enabled");
            }
            g.date_delete = 0;
            Ok(g.clone())
        })
    }

    async fn disable_usergroup(&self, usergroup: &str) -> Result<UserGroup, Error> {
        const METHOD: &str = "usergroups.disable";
        self.enter(METHOD, &[usergroup]).await?;
        self.with_group(METHOD, usergroup, |g| {
            if !g.is_enabled() {
                return Err("already_disabled");
            }
            g.date_delete = 1_700_000_000;
            Ok(g.clone())
        })
    }

    async fn list_usergroup_members(&self, usergroup: &str) -> Result<Vec<String>, Error> {
        const METHOD: &str = "usergroups.users.list";
        self.enter(METHOD, &[usergroup]).await?;
        self.with_group(METHOD, usergroup, |g| Ok(g.users.clone()))
    }

    async fn update_usergroup_members(
        &self,
        usergroup: &str,
        users: &[String],
    ) -> Result<UserGroup, Error> {
        const METHOD: &str = "usergroups.users.update";
        self.enter(METHOD, &[usergroup, users.join(",").as_str()]).await?;
        self.with_group(METHOD, usergroup, |g| {
            g.users = users.to_vec();
            Ok(g.clone())
        })
    }
}

/// Provider over `fake` with a fresh in-memory cache.
pub fn provider(fake: &Arc<FakeSlack>) -> Provider {
    Provider::new(fake.clone(), Arc::new(MemoryCache::new()))
}
