use crate::domain::model::{SurveyForm, ZipResolution};
use crate::domain::ports::ZipSource;
use regex::Regex;
use std::sync::LazyLock;

static ZIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").unwrap());

pub fn is_valid_zip_format(zip: &str) -> bool {
    ZIP_PATTERN.is_match(zip)
}

pub struct ZipResolver<Z: ZipSource> {
    source: Z,
}

impl<Z: ZipSource> ZipResolver<Z> {
    pub fn new(source: Z) -> Self {
        Self { source }
    }

    /// 解析 ZIP。格式不符時不發出請求；查詢失敗只回報在欄位旁，不往上拋
    pub async fn resolve(&self, zip: &str) -> ZipResolution {
        let zip = zip.trim();
        if !is_valid_zip_format(zip) {
            tracing::debug!("ZIP '{}' is not 5 digits, skipping lookup", zip);
            return ZipResolution::BadFormat;
        }

        let table = match self.source.fetch_table().await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("⚠️ ZIP lookup for {} failed: {}", zip, e);
                return ZipResolution::LookupError;
            }
        };

        match table.find(zip) {
            Some(record) => {
                tracing::debug!("ZIP {} resolved to {}, {}", zip, record.city, record.state);
                ZipResolution::Resolved {
                    zip: record.zip.clone(),
                    city: record.city.clone(),
                    state: record.state.clone(),
                }
            }
            None => {
                tracing::debug!("ZIP {} not present in lookup table", zip);
                ZipResolution::NotFound
            }
        }
    }
}

/// 把查詢結果寫回表單。不檢查 ZIP 欄位是否已被改動，較晚回來的結果會覆蓋較新的狀態
pub fn apply_resolution(form: &mut SurveyForm, resolution: ZipResolution) {
    form.zip_resolution = resolution;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ZipLookupTable;
    use crate::domain::model::ZipRecord;
    use crate::utils::error::{Result, SurveyError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        table: Option<ZipLookupTable>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn with(records: &[(&str, &str, &str)]) -> Self {
            Self {
                table: Some(ZipLookupTable {
                    zipcodes: records
                        .iter()
                        .map(|(zip, city, state)| ZipRecord {
                            zip: zip.to_string(),
                            city: city.to_string(),
                            state: state.to_string(),
                        })
                        .collect(),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                table: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ZipSource for StaticSource {
        async fn fetch_table(&self) -> Result<ZipLookupTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.clone().ok_or_else(|| SurveyError::HttpStatusError {
                status: 500,
                url: "memory".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_resolves_known_zip() {
        let resolver = ZipResolver::new(StaticSource::with(&[("22030", "Fairfax", "VA")]));

        let resolution = resolver.resolve(" 22030 ").await;

        assert_eq!(resolution.city(), "Fairfax");
        assert_eq!(resolution.state(), "VA");
        assert_eq!(resolution.message(), "");
        assert!(resolution.is_resolved_for("22030"));
    }

    #[tokio::test]
    async fn test_unknown_zip_is_invalid() {
        let resolver = ZipResolver::new(StaticSource::with(&[("22030", "Fairfax", "VA")]));

        let resolution = resolver.resolve("90210").await;

        assert_eq!(resolution, ZipResolution::NotFound);
        assert_eq!(resolution.message(), "Invalid ZIP");
        assert_eq!(resolution.city(), "");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_lookup_error() {
        let resolver = ZipResolver::new(StaticSource::failing());

        let resolution = resolver.resolve("22030").await;

        assert_eq!(resolution, ZipResolution::LookupError);
        assert_eq!(resolution.message(), "ZIP lookup error");
        assert_eq!(resolution.state(), "");
    }

    #[tokio::test]
    async fn test_bad_format_skips_fetch() {
        let source = StaticSource::with(&[("22030", "Fairfax", "VA")]);
        let resolver = ZipResolver::new(source);

        for zip in ["2203", "220301", "22o30", "", "２２０３０"] {
            assert_eq!(resolver.resolve(zip).await, ZipResolution::BadFormat);
        }

        assert_eq!(resolver.source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            ZipResolution::BadFormat.message(),
            "ZIP must be 5 digits"
        );
    }

    #[test]
    fn test_apply_resolution_overwrites_previous_state() {
        let mut form = SurveyForm {
            zip_resolution: ZipResolution::Resolved {
                zip: "22030".to_string(),
                city: "Fairfax".to_string(),
                state: "VA".to_string(),
            },
            ..SurveyForm::default()
        };

        apply_resolution(&mut form, ZipResolution::NotFound);

        assert_eq!(form.city(), "");
        assert_eq!(form.state(), "");
        assert_eq!(form.zip_message(), "Invalid ZIP");
    }
}
