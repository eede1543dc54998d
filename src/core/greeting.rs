use crate::domain::model::{Greeting, Salutation};
use crate::domain::ports::{Clock, ConfigProvider, NamePrompt, PreferenceStore};
use std::sync::Arc;

pub const WELCOME_PROMPT: &str = "Welcome! What's your name?";
pub const CHANGE_PROMPT: &str = "Please enter your name:";

/// 依偏好值組出問候語，必要時詢問訪客姓名
pub struct GreetingComposer<S: PreferenceStore, C: ConfigProvider> {
    store: S,
    config: C,
    clock: Arc<dyn Clock>,
}

impl<S: PreferenceStore, C: ConfigProvider> GreetingComposer<S, C> {
    pub fn new(store: S, config: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 頁面載入時呼叫
    pub async fn on_load(&self, prompt: &dyn NamePrompt) -> Greeting {
        if self.current_name().await.is_none() {
            tracing::debug!("No stored visitor name, asking the visitor");
            self.ask_and_store(prompt, WELCOME_PROMPT).await;
        }
        self.compose().await
    }

    /// 訪客點擊「更改姓名」
    pub async fn change_name(&self, prompt: &dyn NamePrompt) -> Greeting {
        if self.ask_and_store(prompt, CHANGE_PROMPT).await {
            tracing::info!("Visitor name updated");
        }
        self.compose().await
    }

    /// 不詢問，只依目前儲存的值組出問候語
    pub async fn compose(&self) -> Greeting {
        match self.current_name().await {
            Some(name) => Greeting::Personal {
                salutation: Salutation::from_hour(self.clock.local_hour()),
                name,
            },
            None => Greeting::Generic,
        }
    }

    async fn current_name(&self) -> Option<String> {
        self.store.get(self.config.preference_name()).await
    }

    async fn ask_and_store(&self, prompt: &dyn NamePrompt, message: &str) -> bool {
        let answer = prompt.ask(message).await;
        let Some(name) = answer.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return false;
        };

        self.store
            .set(
                self.config.preference_name(),
                name,
                self.config.preference_ttl_days(),
            )
            .await;
        true
    }
}
