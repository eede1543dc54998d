use crate::domain::model::Preference;
use crate::domain::ports::{Clock, PreferenceStore, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_TTL_DAYS: u32 = 7;
/// 超過此天數的 TTL 一律截到這裡，避免時間溢位
pub const MAX_TTL_DAYS: u32 = 36_500;

pub(crate) fn expiry_from(now: DateTime<Utc>, ttl_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(ttl_days.min(MAX_TTL_DAYS)))
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// 只存在記憶體中的偏好儲存，程式結束即消失
#[derive(Clone)]
pub struct MemoryPreferenceStore {
    entries: Arc<Mutex<HashMap<String, Preference>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, name: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        let preference = entries.get(name)?;
        if preference.is_expired_at(self.clock.now()) {
            tracing::debug!("Preference '{}' expired at {}", name, preference.expires_at);
            return None;
        }
        Some(preference.value.clone())
    }

    async fn set(&self, name: &str, value: &str, ttl_days: u32) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, p| !p.is_expired_at(now));
        entries.insert(
            name.to_string(),
            Preference {
                value: value.to_string(),
                expires_at: expiry_from(now, ttl_days),
            },
        );
    }
}
