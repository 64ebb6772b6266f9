/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Access token cache
//!
//! Tokens are cached per [`CredentialKey`] for a fixed TTL, in an LRU map of
//! bounded size. An entry goes `absent -> valid -> (expired | evicted) ->
//! absent` and is only ever replaced whole.
//!
//! Concurrent misses on the same key are coalesced: the first caller issues
//! the token while the others wait on a per-key gate and then read the cache.
//! Misses on different keys never wait on each other. A failed issuance is
//! not cached, so the next caller tries again.

use crate::application::auth::TokenIssuer;
use crate::application::config::TokenCacheConfig;
use crate::error::AppError;
use crate::model::auth::{AccessToken, Credential, CredentialKey};
use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: StdMutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(start),
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: std::time::Duration) {
        let delta = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Clone)]
struct CachedToken {
    token: AccessToken,
    issued_at: DateTime<Utc>,
}

/// Shared, TTL and size bounded cache of access tokens
pub struct TokenCache {
    issuer: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    entries: Mutex<LruCache<CredentialKey, CachedToken>>,
    gates: StdMutex<HashMap<CredentialKey, Arc<Mutex<()>>>>,
}

impl TokenCache {
    /// Creates a cache using the wall clock
    pub fn new(issuer: Arc<dyn TokenIssuer>, config: &TokenCacheConfig) -> Self {
        Self::with_clock(issuer, config, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`
    pub fn with_clock(
        issuer: Arc<dyn TokenIssuer>,
        config: &TokenCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        let ttl = TimeDelta::try_seconds(i64::try_from(config.ttl_seconds).unwrap_or(i64::MAX))
            .unwrap_or(TimeDelta::MAX);
        Self {
            issuer,
            clock,
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
            gates: StdMutex::new(HashMap::new()),
        }
    }

    /// Returns a valid token for `credential`, issuing one on a miss
    ///
    /// At most one issuance per credential is in flight at any time. Callers
    /// arriving while it runs wait for it and reuse its token.
    ///
    /// # Arguments
    ///
    /// * `credential` - Credential whose API user and password identify the entry
    ///
    /// # Returns
    ///
    /// The cached token while it is younger than the TTL, a freshly issued
    /// one otherwise
    ///
    /// # Errors
    ///
    /// Whatever the issuer returns. Failures are not cached.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use msc_client::prelude::*;
    ///
    /// let config = Config::new();
    /// let issuer = Arc::new(HttpTokenIssuer::new(&config, transport));
    /// let cache = TokenCache::new(issuer, &config.token_cache);
    ///
    /// let credential = Credential::new("20299078000166", "api-user", "api-pass")?;
    /// let token = cache.get_token(&credential).await?;
    /// ```
    pub async fn get_token(&self, credential: &Credential) -> Result<AccessToken, AppError> {
        let key = credential.cache_key();

        if let Some(token) = self.lookup(&key).await {
            debug!("Token cache hit for {:?}", key);
            return Ok(token);
        }

        let gate = self.acquire_gate(key);
        let result = {
            let _permit = gate.lock().await;
            match self.lookup(&key).await {
                Some(token) => {
                    debug!("Token for {:?} issued by a concurrent caller", key);
                    Ok(token)
                }
                None => self.issue(key, credential).await,
            }
        };
        self.release_gate(&key, gate);

        result
    }

    /// Drops the cached token of `credential`, if any
    pub async fn invalidate(&self, credential: &Credential) {
        let key = credential.cache_key();
        if self.entries.lock().await.pop(&key).is_some() {
            debug!("Invalidated token for {:?}", key);
        }
    }

    /// Drops every cached token
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, expired ones included until they are touched
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// `true` when nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn lookup(&self, key: &CredentialKey) -> Option<AccessToken> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let cached = entries.get(key)?;
        if self.is_live(cached, now) {
            return Some(cached.token.clone());
        }
        entries.pop(key);
        debug!("Token for {:?} expired", key);
        None
    }

    async fn issue(
        &self,
        key: CredentialKey,
        credential: &Credential,
    ) -> Result<AccessToken, AppError> {
        info!("Requesting new access token for {:?}", key);
        let token = match self.issuer.issue(credential).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Token issuance for {:?} failed: {}", key, e);
                return Err(e);
            }
        };

        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        if entries.len() == entries.cap().get() && !entries.contains(&key) {
            self.purge_expired(&mut entries, now);
        }
        let entry = CachedToken {
            token: token.clone(),
            issued_at: now,
        };
        if let Some((evicted, _)) = entries.push(key, entry) {
            if evicted != key {
                debug!("Evicted token for {:?}", evicted);
            }
        }
        Ok(token)
    }

    fn purge_expired(&self, entries: &mut LruCache<CredentialKey, CachedToken>, now: DateTime<Utc>) {
        let expired: Vec<CredentialKey> = entries
            .iter()
            .filter(|(_, cached)| !self.is_live(cached, now))
            .map(|(key, _)| *key)
            .collect();
        for key in expired {
            entries.pop(&key);
        }
    }

    fn is_live(&self, cached: &CachedToken, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(cached.issued_at) < self.ttl
    }

    fn acquire_gate(&self, key: CredentialKey) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        gates.entry(key).or_default().clone()
    }

    fn release_gate(&self, key: &CredentialKey, gate: Arc<Mutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        // one reference in the map, one held here
        if Arc::strong_count(&gate) <= 2 {
            gates.remove(key);
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
