// ── Remote error classification ──
//
// Slack answers a repeated mutation with a descriptive error instead of a
// silent success. This module is the only place that looks at those error
// strings: it turns them into a closed set of kinds, and reconcilers decide
// per lifecycle step which kinds mean "the goal is already met".

use strum::{Display, EnumString, IntoStaticStr};

use crate::cache::Interrupted;

/// Error codes meaning the requested end state already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AlreadyMet {
    /// `conversations.invite` for a user who is already a member.
    AlreadyInChannel,
    /// `conversations.archive` on an archived conversation.
    AlreadyArchived,
    /// `conversations.unarchive` on a live conversation.
    NotArchived,
    /// `usergroups.enable` on an enabled group.
    AlreadyEnabled,
    /// `usergroups.disable` on a disabled group.
    AlreadyDisabled,
    /// `conversations.kick` for a user who is not a member.
    NotInChannel,
}

/// Error codes meaning the remote entity does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Missing {
    ChannelNotFound,
    NoSuchSubteam,
}

/// Classified remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    GoalAlreadyMet(AlreadyMet),
    NotFound(Missing),
    Other,
}

/// Classify a Web API error by its Slack error code.
///
/// Only envelope errors can be goal-met or not-found; transport, HTTP and
/// rate-limit failures are always `Other`.
pub fn classify(err: &slackform_api::Error) -> RemoteErrorKind {
    let Some(code) = err.slack_code() else {
        return RemoteErrorKind::Other;
    };
    if let Ok(met) = code.parse::<AlreadyMet>() {
        return RemoteErrorKind::GoalAlreadyMet(met);
    }
    if let Ok(missing) = code.parse::<Missing>() {
        return RemoteErrorKind::NotFound(missing);
    }
    RemoteErrorKind::Other
}

/// Outcome of a single remote call made on behalf of a reconciler.
#[derive(Debug)]
pub enum CallError {
    /// The host runtime cancelled the operation. Never tolerated.
    Cancelled,
    /// Slack (or the transport) reported a failure.
    Remote {
        kind: RemoteErrorKind,
        source: slackform_api::Error,
    },
}

impl From<Interrupted> for CallError {
    fn from(_: Interrupted) -> Self {
        Self::Cancelled
    }
}

impl From<slackform_api::Error> for CallError {
    fn from(source: slackform_api::Error) -> Self {
        Self::Remote {
            kind: classify(&source),
            source,
        }
    }
}

impl CallError {
    pub fn kind(&self) -> Option<RemoteErrorKind> {
        match self {
            Self::Cancelled => None,
            Self::Remote { kind, .. } => Some(*kind),
        }
    }

    /// `true` if the failure means `expected` already holds.
    pub fn is_goal_met(&self, expected: AlreadyMet) -> bool {
        self.kind() == Some(RemoteErrorKind::GoalAlreadyMet(expected))
    }

    /// `true` if the remote entity does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(self.kind(), Some(RemoteErrorKind::NotFound(_)))
    }
}
