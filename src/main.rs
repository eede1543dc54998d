use campus_survey::config::toml_config::LogFormat;
use campus_survey::core::summarizer;
use campus_survey::core::{ConfigProvider, SubmitOutcome, SurveyAnswers, SystemClock};
use campus_survey::utils::error::ErrorSeverity;
use campus_survey::utils::{logger, validation::Validate};
use campus_survey::{
    CliConfig, Command, FilePreferenceStore, GreetingComposer, StdinPrompt, SurveyConfig,
    SurveyError, SurveyPage, ZipResolver,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match SurveyConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = cli.verbose || config.logging.verbose;
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting campus-survey");
    if verbose {
        tracing::debug!("CLI args: {:?}", cli);
        tracing::debug!("Survey config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(cli.command, config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ campus-survey failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(command: Command, config: SurveyConfig) -> Result<i32, SurveyError> {
    let store = FilePreferenceStore::new(&config.preference.path);
    let source = config.lookup_source()?;
    let site_title = config.site_title().to_string();
    let composer = GreetingComposer::new(store, config, Arc::new(SystemClock));
    let page = SurveyPage::new(composer, ZipResolver::new(source));
    let prompt = StdinPrompt::stdin();

    match command {
        Command::Greet => {
            let greeting = page.load(&prompt).await;
            println!("{}", greeting.render(&site_title));
            if let Some(link) = greeting.change_affordance() {
                println!("{} (run `campus-survey rename`)", link);
            }
        }
        Command::Rename => {
            let greeting = page.change_name(&prompt).await;
            println!("{}", greeting.render(&site_title));
        }
        Command::Summarize { data } => match summarizer::parse_numbers(&data) {
            Some(list) => {
                let summary = summarizer::compute_avg_max(&list);
                println!("Average: {}", summary.average);
                println!("Maximum: {}", summary.maximum);
            }
            None => {
                eprintln!("❌ Data must be exactly ten comma-separated numbers between 1 and 100.");
                return Ok(1);
            }
        },
        Command::Zip { code } => {
            page.edit(|form| form.zip = code).await;
            if let Some(lookup) = page.on_zip_blur().await {
                if lookup.await.is_err() {
                    tracing::warn!("⚠️ ZIP lookup task did not complete");
                }
            }
            let form = page.snapshot().await;
            if !form.zip_message().is_empty() {
                eprintln!("❌ {}", form.zip_message());
                return Ok(1);
            }
            println!("City: {}", form.city());
            println!("State: {}", form.state());
        }
        Command::Submit { answers } => {
            let content = tokio::fs::read_to_string(&answers).await?;
            let answers: SurveyAnswers =
                toml::from_str(&content).map_err(|e| SurveyError::ConfigValidationError {
                    field: "answers".to_string(),
                    message: format!("TOML parsing error: {}", e),
                })?;

            let greeting = page.load(&prompt).await;
            println!("{}", greeting.render(&site_title));

            page.fill(answers).await;
            page.on_data_blur().await;
            if let Some(lookup) = page.on_zip_blur().await {
                if lookup.await.is_err() {
                    tracing::warn!("⚠️ ZIP lookup task did not complete");
                }
            }

            match page.on_submit().await {
                SubmitOutcome::Proceed => println!("✅ Survey submitted"),
                SubmitOutcome::Suppressed(report) => {
                    eprintln!("{}", report.render());
                    return Ok(1);
                }
            }
        }
    }

    Ok(0)
}
