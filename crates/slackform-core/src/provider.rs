// ── Provider ──
//
// Shared state handed to every reconciler call: the remote API, the list
// cache and its single-flight guard.

use std::fmt;
use std::sync::Arc;

use slackform_api::{SlackClient, TransportConfig, UserGroup};
use tracing::debug;

use crate::api::SlackApi;
use crate::cache::{FileCache, ListCache, MemoryCache, SingleFlight, USERGROUPS_CACHE_KEY};
use crate::config::{CacheLocation, ProviderConfig};
use crate::context::Op;
use crate::error::CoreError;
use crate::remote::CallError;

#[derive(Clone)]
pub struct Provider {
    api: Arc<dyn SlackApi>,
    cache: Arc<dyn ListCache>,
    flights: Arc<SingleFlight>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Assemble a provider from its parts (tests inject fakes here).
    pub fn new(api: Arc<dyn SlackApi>, cache: Arc<dyn ListCache>) -> Self {
        Self {
            api,
            cache,
            flights: Arc::new(SingleFlight::new()),
        }
    }

    /// Build the HTTP client and cache described by `config`.
    pub fn connect(config: &ProviderConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = SlackClient::with_base_url(config.base_url.clone(), &config.token, &transport)?;
        debug!(base_url = %client.base_url(), "slack client ready");

        let cache: Arc<dyn ListCache> = match &config.cache {
            CacheLocation::Directory(dir) => Arc::new(FileCache::new(dir.clone())),
            CacheLocation::Memory => Arc::new(MemoryCache::new()),
        };
        Ok(Self::new(Arc::new(client), cache))
    }

    pub fn api(&self) -> &dyn SlackApi {
        self.api.as_ref()
    }

    pub fn cache(&self) -> &dyn ListCache {
        self.cache.as_ref()
    }

    /// All user groups, read through the list cache.
    pub(crate) async fn usergroups(&self, op: &Op) -> Result<Vec<UserGroup>, CallError> {
        let api = self.api.as_ref();
        self.flights
            .cached_or_fetch(
                self.cache.as_ref(),
                USERGROUPS_CACHE_KEY,
                op.cancellation(),
                || op.call(api.list_usergroups()),
            )
            .await
    }
}
