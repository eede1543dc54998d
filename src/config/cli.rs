use crate::core::preference::expiry_from;
use crate::domain::model::Preference;
use crate::domain::ports::{Clock, NamePrompt, PreferenceStore, SystemClock};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// 以 JSON 檔保存偏好值，相當於瀏覽器的 cookie
#[derive(Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> HashMap<String, Preference> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!("⚠️ Preference file {} unreadable: {}", self.path.display(), e);
                return HashMap::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Preference file {} is corrupt: {}", self.path.display(), e);
            HashMap::new()
        })
    }

    async fn save(&self, entries: &HashMap<String, Preference>) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, name: &str) -> Option<String> {
        let entries = self.load().await;
        let preference = entries.get(name)?;
        if preference.is_expired_at(self.clock.now()) {
            tracing::debug!("Preference '{}' expired at {}", name, preference.expires_at);
            return None;
        }
        Some(preference.value.clone())
    }

    async fn set(&self, name: &str, value: &str, ttl_days: u32) {
        let now = self.clock.now();
        let mut entries = self.load().await;
        entries.retain(|_, p| !p.is_expired_at(now));
        entries.insert(
            name.to_string(),
            Preference {
                value: value.to_string(),
                expires_at: expiry_from(now, ttl_days),
            },
        );

        // 寫入失敗時靜默降級，下次讀取會視為不存在
        if let Err(e) = self.save(&entries).await {
            tracing::warn!(
                "⚠️ Could not persist preference '{}' to {}: {}",
                name,
                self.path.display(),
                e
            );
        }
    }
}

/// 逐行讀取答案的姓名對話框；EOF 或讀取失敗視為取消。
/// 讀取端在多次詢問之間共用，已緩衝的輸入不會遺失
pub struct LinePrompt<R> {
    reader: Mutex<R>,
}

pub type StdinPrompt = LinePrompt<BufReader<Stdin>>;

impl StdinPrompt {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LinePrompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> NamePrompt for LinePrompt<R> {
    async fn ask(&self, message: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{} ", message).as_bytes()).await.ok()?;
        stdout.flush().await.ok()?;

        let mut line = String::new();
        let mut reader = self.reader.lock().await;
        match reader.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("⚠️ Could not read name: {}", e);
                None
            }
        }
    }
}
