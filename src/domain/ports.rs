use crate::domain::model::ZipLookupTable;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

/// 訪客端的偏好儲存。失敗時一律當作不存在，不回傳錯誤
pub trait PreferenceStore: Send + Sync {
    fn get(&self, name: &str) -> impl std::future::Future<Output = Option<String>> + Send;
    fn set(
        &self,
        name: &str,
        value: &str,
        ttl_days: u32,
    ) -> impl std::future::Future<Output = ()> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn site_title(&self) -> &str;
    fn preference_name(&self) -> &str;
    fn preference_ttl_days(&self) -> u32;
}

/// 向訪客詢問姓名的對話框；`None` 表示訪客取消
#[async_trait]
pub trait NamePrompt: Send + Sync {
    async fn ask(&self, message: &str) -> Option<String>;
}

/// 靜態 ZIP 查詢表的來源，每次呼叫都重新取得
#[async_trait]
pub trait ZipSource: Send + Sync {
    async fn fetch_table(&self) -> Result<ZipLookupTable>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn local_hour(&self) -> u32 {
        use chrono::Timelike;
        self.now().with_timezone(&Local).hour()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
