use crate::core::summarizer::parse_numbers;
use crate::core::zip_resolver::is_valid_zip_format;
use crate::domain::model::{
    FormField, SubmitOutcome, SurveyForm, ValidationReport, Violation, ViolationKind,
    ZipResolution,
};
use regex::Regex;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").unwrap());
static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s,.\-#]+$").unwrap());
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const NAME_MESSAGE: &str = "Name must contain only alphabets and spaces.";
pub const ADDRESS_MESSAGE: &str = "Address may contain letters, numbers, spaces, and , . - #";
pub const LIKES_MESSAGE: &str = "Please select at least two items you liked about the campus.";
pub const INTEREST_MESSAGE: &str = "Please select how you became interested in the university.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const ZIP_FORMAT_MESSAGE: &str = "ZIP must be 5 digits.";
pub const ZIP_UNRESOLVED_MESSAGE: &str =
    "Please enter a valid ZIP so City and State can be populated.";
pub const DATA_MESSAGE: &str =
    "Data must be exactly ten comma-separated numbers between 1 and 100.";

pub const MIN_LIKES: usize = 2;

pub type Rule = fn(&SurveyForm) -> Option<Violation>;

/// 送出時依序執行的規則，全部都會執行
pub const RULES: [Rule; 7] = [
    check_name,
    check_address,
    check_likes,
    check_interest,
    check_email,
    check_zip,
    check_data,
];

fn violation(field: FormField, kind: ViolationKind, message: &'static str) -> Option<Violation> {
    Some(Violation {
        field,
        kind,
        message,
    })
}

fn pattern_rule(
    pattern: &Regex,
    value: &str,
    field: FormField,
    message: &'static str,
) -> Option<Violation> {
    if pattern.is_match(value.trim()) {
        None
    } else {
        violation(field, ViolationKind::Format, message)
    }
}

pub fn check_name(form: &SurveyForm) -> Option<Violation> {
    pattern_rule(&NAME_PATTERN, &form.name, FormField::Name, NAME_MESSAGE)
}

pub fn check_address(form: &SurveyForm) -> Option<Violation> {
    pattern_rule(
        &ADDRESS_PATTERN,
        &form.address,
        FormField::Address,
        ADDRESS_MESSAGE,
    )
}

pub fn check_likes(form: &SurveyForm) -> Option<Violation> {
    if form.likes.len() >= MIN_LIKES {
        None
    } else {
        violation(FormField::Likes, ViolationKind::Selection, LIKES_MESSAGE)
    }
}

pub fn check_interest(form: &SurveyForm) -> Option<Violation> {
    match form.interest.as_deref().map(str::trim) {
        Some(choice) if !choice.is_empty() => None,
        _ => violation(FormField::Interest, ViolationKind::Selection, INTEREST_MESSAGE),
    }
}

pub fn check_email(form: &SurveyForm) -> Option<Violation> {
    pattern_rule(&EMAIL_PATTERN, &form.email, FormField::Email, EMAIL_MESSAGE)
}

/// 格式正確但尚未成功查到城市/州，仍然算違規
pub fn check_zip(form: &SurveyForm) -> Option<Violation> {
    let zip = form.zip.trim();
    if !is_valid_zip_format(zip) {
        return violation(FormField::Zip, ViolationKind::Format, ZIP_FORMAT_MESSAGE);
    }
    if !form.zip_resolution.is_resolved_for(zip) {
        return violation(
            FormField::Zip,
            ViolationKind::Resolution,
            ZIP_UNRESOLVED_MESSAGE,
        );
    }
    None
}

pub fn check_data(form: &SurveyForm) -> Option<Violation> {
    match parse_numbers(&form.data) {
        Some(_) => None,
        None => violation(FormField::Data, ViolationKind::Format, DATA_MESSAGE),
    }
}

pub fn validate(form: &SurveyForm) -> ValidationReport {
    ValidationReport {
        violations: RULES.iter().filter_map(|rule| rule(form)).collect(),
    }
}

/// 只清除有違規的欄位與其衍生值；勾選類欄位保持原樣
pub fn clear_offending_fields(form: &mut SurveyForm, report: &ValidationReport) {
    if report.has_violation(FormField::Name) {
        form.name.clear();
    }
    if report.has_violation(FormField::Address) {
        form.address.clear();
    }
    if report.has_violation(FormField::Email) {
        form.email.clear();
    }
    if report.has_violation(FormField::Zip) {
        form.zip.clear();
        form.zip_resolution = ZipResolution::Unresolved;
    }
    if report.has_violation(FormField::Data) {
        form.data.clear();
        form.clear_summary();
    }
}

/// 送出前的檢查：有任何違規就阻止送出並回傳合併後的報告
pub fn on_submit(form: &mut SurveyForm) -> SubmitOutcome {
    let report = validate(form);
    if report.is_valid() {
        tracing::info!("✅ Survey passed validation, submitting");
        return SubmitOutcome::Proceed;
    }

    tracing::info!(
        "Survey submission suppressed with {} violation(s)",
        report.violations.len()
    );
    clear_offending_fields(form, &report);
    SubmitOutcome::Suppressed(report)
}

/// 重設表單，同時清掉所有衍生欄位與訊息
pub fn on_reset(form: &mut SurveyForm) {
    *form = SurveyForm::default();
}
