use crate::domain::model::{NumberList, Summary, SurveyForm};

pub const REQUIRED_COUNT: usize = 10;
pub const MIN_VALUE: f64 = 1.0;
pub const MAX_VALUE: f64 = 100.0;

/// 解析逗號分隔的十個數字；任何不符合的輸入都回傳 `None`
pub fn parse_numbers(text: &str) -> Option<NumberList> {
    let mut tokens: Vec<&str> = text.split(',').map(str::trim).collect();

    // 只去掉頭尾的空字串，中間的空值仍算一個無效的 token
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    let leading = tokens.iter().take_while(|t| t.is_empty()).count();
    let tokens = &tokens[leading..];

    if tokens.len() != REQUIRED_COUNT {
        return None;
    }

    let mut values = [0.0; REQUIRED_COUNT];
    for (slot, token) in values.iter_mut().zip(tokens) {
        let value: f64 = token.parse().ok()?;
        if !value.is_finite() || !(MIN_VALUE..=MAX_VALUE).contains(&value) {
            return None;
        }
        *slot = value;
    }

    Some(NumberList(values))
}

pub fn compute_avg_max(list: &NumberList) -> Summary {
    let values = list.values();
    let sum: f64 = values.iter().sum();
    let average = round_to_cents(sum / values.len() as f64);
    let maximum = values.iter().copied().fold(f64::MIN, f64::max);

    Summary { average, maximum }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 資料欄位失去焦點時更新平均與最大值，無效時清空避免顯示舊值
pub fn on_data_blur(form: &mut SurveyForm) -> Option<Summary> {
    match parse_numbers(&form.data) {
        Some(list) => {
            let summary = compute_avg_max(&list);
            form.average = Some(summary.average);
            form.maximum = Some(summary.maximum);
            Some(summary)
        }
        None => {
            form.clear_summary();
            None
        }
    }
}
