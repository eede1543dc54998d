use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 儲存在訪客端的偏好值，過期後視為不存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Preference {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 恰好十個介於 1 到 100 的數字
#[derive(Debug, Clone, PartialEq)]
pub struct NumberList(pub(crate) [f64; 10]);

impl NumberList {
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub average: f64,
    pub maximum: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRecord {
    pub zip: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipLookupTable {
    #[serde(default)]
    pub zipcodes: Vec<ZipRecord>,
}

impl ZipLookupTable {
    pub fn find(&self, zip: &str) -> Option<&ZipRecord> {
        self.zipcodes.iter().find(|record| record.zip == zip)
    }
}

/// ZIP 欄位目前的解析狀態，取代以畫面上城市/州文字判斷是否已解析
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ZipResolution {
    #[default]
    Unresolved,
    BadFormat,
    Resolved {
        zip: String,
        city: String,
        state: String,
    },
    NotFound,
    LookupError,
}

impl ZipResolution {
    pub const BAD_FORMAT_MESSAGE: &'static str = "ZIP must be 5 digits";
    pub const NOT_FOUND_MESSAGE: &'static str = "Invalid ZIP";
    pub const LOOKUP_ERROR_MESSAGE: &'static str = "ZIP lookup error";

    pub fn city(&self) -> &str {
        match self {
            ZipResolution::Resolved { city, .. } => city,
            _ => "",
        }
    }

    pub fn state(&self) -> &str {
        match self {
            ZipResolution::Resolved { state, .. } => state,
            _ => "",
        }
    }

    /// 顯示在 ZIP 欄位旁的訊息
    pub fn message(&self) -> &'static str {
        match self {
            ZipResolution::Unresolved | ZipResolution::Resolved { .. } => "",
            ZipResolution::BadFormat => Self::BAD_FORMAT_MESSAGE,
            ZipResolution::NotFound => Self::NOT_FOUND_MESSAGE,
            ZipResolution::LookupError => Self::LOOKUP_ERROR_MESSAGE,
        }
    }

    pub fn is_resolved_for(&self, zip: &str) -> bool {
        matches!(self, ZipResolution::Resolved { zip: resolved, .. } if resolved == zip)
    }
}

/// 表單的欄位分類，用來決定驗證失敗時要清除哪些欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Address,
    Likes,
    Interest,
    Email,
    Zip,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Format,
    Selection,
    Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: FormField,
    pub kind: ViolationKind,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.message).collect()
    }

    pub fn has_violation(&self, field: FormField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// 合併成一則訊息給訪客
    pub fn render(&self) -> String {
        format!(
            "Please correct the following issues:\n\n- {}",
            self.messages().join("\n- ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    Suppressed(ValidationReport),
}

/// 問卷表單的輸入欄位與衍生欄位
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyForm {
    pub name: String,
    pub address: String,
    pub likes: BTreeSet<String>,
    pub interest: Option<String>,
    pub email: String,
    pub zip: String,
    pub data: String,

    pub average: Option<f64>,
    pub maximum: Option<f64>,
    pub zip_resolution: ZipResolution,
}

impl SurveyForm {
    pub fn city(&self) -> &str {
        self.zip_resolution.city()
    }

    pub fn state(&self) -> &str {
        self.zip_resolution.state()
    }

    pub fn zip_message(&self) -> &'static str {
        self.zip_resolution.message()
    }

    pub fn clear_summary(&mut self) {
        self.average = None;
        self.maximum = None;
    }
}

/// 訪客可填寫的問卷答案，從 TOML 檔載入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyAnswers {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Salutation {
    Morning,
    Afternoon,
    Evening,
}

impl Salutation {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Salutation::Morning,
            12..=17 => Salutation::Afternoon,
            _ => Salutation::Evening,
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Salutation::Morning => "Good morning",
            Salutation::Afternoon => "Good afternoon",
            Salutation::Evening => "Good evening",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    Personal { salutation: Salutation, name: String },
    Generic,
}

impl Greeting {
    pub fn render(&self, site_title: &str) -> String {
        match self {
            Greeting::Personal { salutation, name } => {
                format!("{} {}, welcome to {}.", salutation.phrase(), name, site_title)
            }
            Greeting::Generic => format!("Welcome to {}.", site_title),
        }
    }

    /// 只有已知姓名時才提供更改的連結
    pub fn change_affordance(&self) -> Option<String> {
        match self {
            Greeting::Personal { name, .. } => Some(format!("Not {}? Click to update.", name)),
            Greeting::Generic => None,
        }
    }
}

impl From<SurveyAnswers> for SurveyForm {
    fn from(answers: SurveyAnswers) -> Self {
        Self {
            name: answers.name,
            address: answers.address,
            likes: answers.likes.into_iter().collect(),
            interest: answers.interest,
            email: answers.email,
            zip: answers.zip,
            data: answers.data,
            ..Self::default()
        }
    }
}
