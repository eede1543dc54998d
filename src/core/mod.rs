pub mod greeting;
pub mod lookup;
pub mod page;
pub mod preference;
pub mod summarizer;
pub mod validator;
pub mod zip_resolver;

pub use crate::domain::model::{
    Greeting, SubmitOutcome, SurveyAnswers, SurveyForm, ValidationReport, ZipResolution,
};
pub use crate::domain::ports::{
    Clock, ConfigProvider, NamePrompt, PreferenceStore, SystemClock, ZipSource,
};
pub use crate::utils::error::Result;
