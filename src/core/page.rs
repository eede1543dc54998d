use crate::core::greeting::GreetingComposer;
use crate::core::zip_resolver::{apply_resolution, is_valid_zip_format, ZipResolver};
use crate::core::{summarizer, validator};
use crate::domain::model::{
    Greeting, SubmitOutcome, Summary, SurveyAnswers, SurveyForm, ZipResolution,
};
use crate::domain::ports::{ConfigProvider, NamePrompt, PreferenceStore, ZipSource};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// 問卷頁面：持有表單狀態，並把各元件接到頁面事件上
pub struct SurveyPage<S: PreferenceStore, C: ConfigProvider, Z: ZipSource> {
    composer: GreetingComposer<S, C>,
    resolver: Arc<ZipResolver<Z>>,
    form: Arc<Mutex<SurveyForm>>,
}

impl<S, C, Z> SurveyPage<S, C, Z>
where
    S: PreferenceStore,
    C: ConfigProvider,
    Z: ZipSource + 'static,
{
    pub fn new(composer: GreetingComposer<S, C>, resolver: ZipResolver<Z>) -> Self {
        Self {
            composer,
            resolver: Arc::new(resolver),
            form: Arc::new(Mutex::new(SurveyForm::default())),
        }
    }

    pub async fn load(&self, prompt: &dyn NamePrompt) -> Greeting {
        tracing::info!("Survey page loaded");
        self.composer.on_load(prompt).await
    }

    pub async fn change_name(&self, prompt: &dyn NamePrompt) -> Greeting {
        self.composer.change_name(prompt).await
    }

    /// 以訪客的答案取代輸入欄位，衍生欄位回到初始狀態
    pub async fn fill(&self, answers: SurveyAnswers) {
        *self.form.lock().await = SurveyForm::from(answers);
    }

    pub async fn edit<F: FnOnce(&mut SurveyForm)>(&self, f: F) {
        f(&mut *self.form.lock().await);
    }

    pub async fn snapshot(&self) -> SurveyForm {
        self.form.lock().await.clone()
    }

    pub async fn on_data_blur(&self) -> Option<Summary> {
        summarizer::on_data_blur(&mut *self.form.lock().await)
    }

    /// ZIP 欄位失去焦點。格式正確時在背景查詢並回傳該工作；不取消先前仍在進行的查詢
    pub async fn on_zip_blur(&self) -> Option<JoinHandle<ZipResolution>> {
        let zip = {
            let mut form = self.form.lock().await;
            let zip = form.zip.trim().to_string();
            if !is_valid_zip_format(&zip) {
                apply_resolution(&mut form, ZipResolution::BadFormat);
                return None;
            }
            apply_resolution(&mut form, ZipResolution::Unresolved);
            zip
        };

        let resolver = Arc::clone(&self.resolver);
        let form = Arc::clone(&self.form);
        Some(tokio::spawn(async move {
            let resolution = resolver.resolve(&zip).await;
            apply_resolution(&mut *form.lock().await, resolution.clone());
            resolution
        }))
    }

    pub async fn on_submit(&self) -> SubmitOutcome {
        validator::on_submit(&mut *self.form.lock().await)
    }

    pub async fn on_reset(&self) {
        validator::on_reset(&mut *self.form.lock().await);
    }
}
