use anyhow::Result;
use async_trait::async_trait;
use campus_survey::core::validator::{
    ADDRESS_MESSAGE, DATA_MESSAGE, EMAIL_MESSAGE, INTEREST_MESSAGE, LIKES_MESSAGE, NAME_MESSAGE,
    ZIP_FORMAT_MESSAGE,
};
use campus_survey::core::{NamePrompt, SubmitOutcome, SurveyAnswers, SystemClock};
use campus_survey::{
    FilePreferenceStore, GreetingComposer, LookupSource, SurveyConfig, SurveyPage, ZipResolver,
};
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

struct FixedPrompt(Option<&'static str>);

#[async_trait]
impl NamePrompt for FixedPrompt {
    async fn ask(&self, _message: &str) -> Option<String> {
        self.0.map(String::from)
    }
}

fn zipcodes() -> serde_json::Value {
    serde_json::json!({
        "zipcodes": [
            {"zip": "22030", "city": "Fairfax", "state": "VA"},
            {"zip": "20001", "city": "Washington", "state": "DC"}
        ]
    })
}

fn config_for(server: &MockServer, temp_dir: &TempDir) -> Result<SurveyConfig> {
    let toml_content = format!(
        r#"
[site]
title = "SWE642 Survey"
base_url = "{}"

[preference]
path = "{}"
"#,
        server.url("/hw2/index.html"),
        temp_dir
            .path()
            .join("preferences.json")
            .to_string_lossy()
            .replace('\\', "/")
    );
    Ok(SurveyConfig::from_toml_str(&toml_content)?)
}

fn build_page(
    config: SurveyConfig,
) -> Result<SurveyPage<FilePreferenceStore, SurveyConfig, LookupSource>> {
    let store = FilePreferenceStore::new(&config.preference.path);
    let source = config.lookup_source()?;
    let composer = GreetingComposer::new(store, config, Arc::new(SystemClock));
    Ok(SurveyPage::new(composer, ZipResolver::new(source)))
}

fn good_answers() -> SurveyAnswers {
    SurveyAnswers {
        name: "Ada Lovelace".to_string(),
        address: "4400 University Dr, #3".to_string(),
        likes: vec!["students".to_string(), "location".to_string()],
        interest: Some("internet".to_string()),
        email: "ada@gmu.edu".to_string(),
        zip: "22030".to_string(),
        data: "10,20,30,40,50,60,70,80,90,100".to_string(),
    }
}

#[tokio::test]
async fn test_valid_survey_submits_after_zip_lookup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let lookup_mock = server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(zipcodes());
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    page.fill(good_answers()).await;

    let summary = page.on_data_blur().await.expect("data should parse");
    assert_eq!(summary.average, 55.0);
    assert_eq!(summary.maximum, 100.0);

    let lookup = page.on_zip_blur().await.expect("lookup should start");
    lookup.await?;
    lookup_mock.assert();

    let form = page.snapshot().await;
    assert_eq!(form.city(), "Fairfax");
    assert_eq!(form.state(), "VA");

    assert_eq!(page.on_submit().await, SubmitOutcome::Proceed);
    Ok(())
}

#[tokio::test]
async fn test_unknown_zip_blocks_submission() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(200).json_body(zipcodes());
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    let mut answers = good_answers();
    answers.zip = "99999".to_string();
    page.fill(answers).await;

    page.on_zip_blur().await.expect("lookup should start").await?;
    let form = page.snapshot().await;
    assert_eq!(form.zip_message(), "Invalid ZIP");
    assert_eq!(form.city(), "");

    let SubmitOutcome::Suppressed(report) = page.on_submit().await else {
        panic!("submission should be suppressed");
    };
    assert_eq!(
        report.messages(),
        vec!["Please enter a valid ZIP so City and State can be populated."]
    );

    let form = page.snapshot().await;
    assert_eq!(form.zip, "");
    assert_eq!(form.name, "Ada Lovelace");
    Ok(())
}

#[tokio::test]
async fn test_lookup_failure_reports_locally() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let lookup_mock = server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(500);
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    page.fill(good_answers()).await;

    page.on_zip_blur().await.expect("lookup should start").await?;
    lookup_mock.assert();

    let form = page.snapshot().await;
    assert_eq!(form.zip_message(), "ZIP lookup error");
    assert_eq!(form.city(), "");
    assert_eq!(form.state(), "");
    Ok(())
}

#[tokio::test]
async fn test_malformed_lookup_body_is_lookup_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(200).body("<html>not json</html>");
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    page.fill(good_answers()).await;
    page.on_zip_blur().await.expect("lookup should start").await?;

    assert_eq!(page.snapshot().await.zip_message(), "ZIP lookup error");
    Ok(())
}

#[tokio::test]
async fn test_every_violation_is_aggregated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let lookup_mock = server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(200).json_body(zipcodes());
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    page.fill(SurveyAnswers {
        name: "R2D2".to_string(),
        address: String::new(),
        likes: vec!["sports".to_string()],
        interest: None,
        email: "ada.gmu.edu".to_string(),
        zip: "2203".to_string(),
        data: "1,2,3,4,5,6,7,8,9".to_string(),
    })
    .await;

    page.on_data_blur().await;
    assert!(page.on_zip_blur().await.is_none());
    assert_eq!(page.snapshot().await.zip_message(), "ZIP must be 5 digits");

    let SubmitOutcome::Suppressed(report) = page.on_submit().await else {
        panic!("submission should be suppressed");
    };

    assert_eq!(
        report.messages(),
        vec![
            NAME_MESSAGE,
            ADDRESS_MESSAGE,
            LIKES_MESSAGE,
            INTEREST_MESSAGE,
            EMAIL_MESSAGE,
            ZIP_FORMAT_MESSAGE,
            DATA_MESSAGE,
        ]
    );
    assert!(report
        .render()
        .starts_with("Please correct the following issues:\n\n- Name"));

    let form = page.snapshot().await;
    assert_eq!(form.name, "");
    assert_eq!(form.address, "");
    assert_eq!(form.email, "");
    assert_eq!(form.zip, "");
    assert_eq!(form.city(), "");
    assert_eq!(form.data, "");
    assert_eq!(form.average, None);
    assert_eq!(form.maximum, None);
    assert_eq!(form.likes.len(), 1);
    assert!(form.likes.contains("sports"));
    assert_eq!(form.interest, None);

    // 格式不符時不應發出查詢
    lookup_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_reset_clears_derived_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/hw2/zipcodes.json");
        then.status(200).json_body(zipcodes());
    });

    let page = build_page(config_for(&server, &temp_dir)?)?;
    page.fill(good_answers()).await;
    page.on_data_blur().await;
    page.on_zip_blur().await.expect("lookup should start").await?;

    page.on_reset().await;

    let form = page.snapshot().await;
    assert_eq!(form.average, None);
    assert_eq!(form.maximum, None);
    assert_eq!(form.zip_message(), "");
    assert_eq!(form.city(), "");
    assert_eq!(form.state(), "");
    Ok(())
}

#[tokio::test]
async fn test_greeting_remembers_visitor_between_pages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let first_visit = build_page(config_for(&server, &temp_dir)?)?;
    let greeting = first_visit.load(&FixedPrompt(Some("Grace"))).await;
    assert!(greeting.render("SWE642 Survey").contains("Grace, welcome to SWE642 Survey."));

    // 新的頁面實例讀取同一個偏好檔，不應再詢問
    let second_visit = build_page(config_for(&server, &temp_dir)?)?;
    let greeting = second_visit.load(&FixedPrompt(None)).await;
    assert_eq!(
        greeting.change_affordance().as_deref(),
        Some("Not Grace? Click to update.")
    );

    let greeting = second_visit.change_name(&FixedPrompt(Some(" Ada "))).await;
    assert!(greeting.render("SWE642 Survey").contains("Ada, welcome"));
    Ok(())
}
