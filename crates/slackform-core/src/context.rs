// ── Operation context ──
//
// Every remote call a reconciler makes is raced against the host's
// cancellation token. `Op` also carries the resource identity so that
// failures can be wrapped into a single descriptive line.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::remote::CallError;
use crate::resource::{Operation, ResourceKind};

/// Host-supplied context for one lifecycle operation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn op(&self, kind: ResourceKind, operation: Operation, id: &str) -> Op {
        Op {
            kind,
            operation,
            id: id.to_owned(),
            cancel: self.cancel.clone(),
        }
    }
}

/// Identity-tagged handle for the remote calls of a single operation.
pub(crate) struct Op {
    kind: ResourceKind,
    operation: Operation,
    id: String,
    cancel: CancellationToken,
}

impl Op {
    /// Re-tag after the identity becomes known (create).
    pub(crate) fn set_id(&mut self, id: &str) {
        id.clone_into(&mut self.id);
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Await a remote call unless the operation is cancelled first.
    pub(crate) async fn call<T, F>(&self, fut: F) -> Result<T, CallError>
    where
        F: Future<Output = Result<T, slackform_api::Error>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CallError::Cancelled),
            res = fut => res.map_err(CallError::from),
        }
    }

    /// Fail with `Cancelled` if the host already gave up.
    pub(crate) fn check_cancelled(&self) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        Ok(())
    }

    fn cancelled(&self) -> CoreError {
        CoreError::Cancelled {
            resource: self.kind.to_string(),
            operation: self.operation.to_string(),
            id: self.id.clone(),
        }
    }

    /// Wrap a failed call with resource, operation and identity.
    pub(crate) fn fail(&self, err: CallError) -> CoreError {
        let source = match err {
            CallError::Cancelled => return self.cancelled(),
            CallError::Remote { source, .. } => source,
        };
        let resource = self.kind.to_string();
        let operation = self.operation.to_string();
        let id = self.id.clone();
        if source.is_auth_error() {
            return CoreError::AuthenticationFailed {
                resource,
                operation,
                id,
                message: source.to_string(),
            };
        }
        if let slackform_api::Error::RateLimited { retry_after_secs } = source {
            return CoreError::RateLimited {
                resource,
                operation,
                id,
                retry_after_secs,
            };
        }
        CoreError::Remote {
            resource,
            operation,
            id,
            code: source.slack_code().map(str::to_owned),
            message: source.to_string(),
        }
    }

    pub(crate) fn key_immutable(&self, persisted: &str, declared: &str) -> CoreError {
        CoreError::KeyImmutable {
            resource: self.kind.to_string(),
            persisted: persisted.to_owned(),
            declared: declared.to_owned(),
        }
    }
}
