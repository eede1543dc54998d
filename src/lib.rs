pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Command, CliConfig};

pub use config::cli::{FilePreferenceStore, LinePrompt, StdinPrompt};
pub use config::toml_config::SurveyConfig;
pub use crate::core::{
    greeting::GreetingComposer, lookup::LookupSource, page::SurveyPage,
    preference::MemoryPreferenceStore, zip_resolver::ZipResolver,
};
pub use utils::error::{Result, SurveyError};
