use serde::{Serialize, Deserialize};
use serde_json::Value;
use std::borrow::Cow;

pub const DEFAULT_COUNT: u32 = 3;
pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 20;
pub const DEFAULT_PLATFORM: &str = "YouTube Shorts";
pub const DEFAULT_TONE: &str = "Educational";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GenerationRequest {
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub platform: Option<Value>, // e.g. YouTube Shorts, TikTok, Instagram Reels
    #[serde(default)]
    pub tone: Option<Value>, // e.g. Educational, Storytelling, Motivational
    #[serde(default)]
    pub count: Option<Value>, // number-like: 5, "5", true, null
}

impl GenerationRequest {
    /// The script with surrounding whitespace removed, or `None` when nothing is left.
    pub fn trimmed_script(&self) -> Option<&str> {
        self.script.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn platform(&self) -> Cow<'_, str> {
        prompt_text(self.platform.as_ref()).unwrap_or(Cow::Borrowed(DEFAULT_PLATFORM))
    }

    pub fn tone(&self) -> Cow<'_, str> {
        prompt_text(self.tone.as_ref()).unwrap_or(Cow::Borrowed(DEFAULT_TONE))
    }

    pub fn effective_count(&self) -> u32 {
        resolve_count(self.count.as_ref())
    }
}

/// Free-form prompt field as text. Non-string values are rendered as JSON.
fn prompt_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Coerces a loosely typed count into `[MIN_COUNT, MAX_COUNT]`.
///
/// Anything that is not a positive finite number falls back to `DEFAULT_COUNT`
/// before the clamp is applied, so `-5` resolves to 3, not 1.
pub fn resolve_count(raw: Option<&Value>) -> u32 {
    match raw.and_then(coerce_number) {
        Some(n) if n.is_finite() && n > 0.0 => {
            (n.trunc().min(MAX_COUNT as f64) as u32).clamp(MIN_COUNT, MAX_COUNT)
        }
        _ => DEFAULT_COUNT,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { Some(0.0) } else { s.parse::<f64>().ok() }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// One short-form script as the model is asked to produce it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShortScript {
    pub hook: String,
    pub body: Vec<String>,
    pub cta: String,
}

impl ShortScript {
    pub const MIN_BODY_LINES: usize = 3;
    pub const MAX_BODY_LINES: usize = 6;

    /// Shape problems that strict output mode rejects.
    pub fn shape_violation(&self) -> Option<String> {
        if self.hook.trim().is_empty() {
            return Some("empty hook".to_string());
        }
        if self.cta.trim().is_empty() {
            return Some("empty cta".to_string());
        }
        let lines = self.body.len();
        if !(Self::MIN_BODY_LINES..=Self::MAX_BODY_LINES).contains(&lines) {
            return Some(format!(
                "body has {lines} lines, expected {}-{}",
                Self::MIN_BODY_LINES,
                Self::MAX_BODY_LINES
            ));
        }
        None
    }
}

/// Successful response body. `shorts` is whatever the model returned, passed
/// through without reshaping.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationResponse {
    pub shorts: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count_of(raw: Value) -> u32 {
        resolve_count(Some(&raw))
    }

    #[test]
    fn count_defaults_when_missing_or_not_positive() {
        assert_eq!(resolve_count(None), 3);
        assert_eq!(count_of(json!(null)), 3);
        assert_eq!(count_of(json!(0)), 3);
        assert_eq!(count_of(json!(-5)), 3);
        assert_eq!(count_of(json!("abc")), 3);
        assert_eq!(count_of(json!("")), 3);
        assert_eq!(count_of(json!(false)), 3);
        assert_eq!(count_of(json!([4])), 3);
        assert_eq!(count_of(json!({"n": 4})), 3);
    }

    #[test]
    fn count_is_clamped_and_truncated() {
        assert_eq!(count_of(json!(500)), 20);
        assert_eq!(count_of(json!(20)), 20);
        assert_eq!(count_of(json!(1)), 1);
        assert_eq!(count_of(json!(15)), 15);
        assert_eq!(count_of(json!(12.9)), 12);
        assert_eq!(count_of(json!(0.5)), 1);
        assert_eq!(count_of(json!(1e300)), 20);
    }

    #[test]
    fn count_accepts_numeric_strings_and_booleans() {
        assert_eq!(count_of(json!("7")), 7);
        assert_eq!(count_of(json!(" 9 ")), 9);
        assert_eq!(count_of(json!("Infinity")), 3);
        assert_eq!(count_of(json!(true)), 1);
    }

    #[test]
    fn script_must_have_content_after_trimming() {
        let mut req = GenerationRequest::default();
        assert_eq!(req.trimmed_script(), None);
        req.script = Some("   \n\t".into());
        assert_eq!(req.trimmed_script(), None);
        req.script = Some("  hello world ".into());
        assert_eq!(req.trimmed_script(), Some("hello world"));
    }

    #[test]
    fn platform_and_tone_fall_back_to_form_defaults() {
        let req: GenerationRequest = serde_json::from_value(json!({
            "script": "x",
            "platform": "  ",
        }))
        .unwrap();
        assert_eq!(req.platform(), DEFAULT_PLATFORM);
        assert_eq!(req.tone(), DEFAULT_TONE);

        let req: GenerationRequest = serde_json::from_value(json!({
            "script": "x",
            "platform": "TikTok",
            "tone": "Storytelling",
            "count": "4",
        }))
        .unwrap();
        assert_eq!(req.platform(), "TikTok");
        assert_eq!(req.tone(), "Storytelling");
        assert_eq!(req.effective_count(), 4);
    }

    #[test]
    fn non_string_platform_and_tone_are_rendered_as_text() {
        let req: GenerationRequest = serde_json::from_value(json!({
            "script": "x",
            "platform": 5,
            "tone": true,
        }))
        .unwrap();
        assert_eq!(req.platform(), "5");
        assert_eq!(req.tone(), "true");

        let req: GenerationRequest = serde_json::from_value(json!({ "script": "x", "tone": null })).unwrap();
        assert_eq!(req.tone(), DEFAULT_TONE);
    }

    #[test]
    fn shape_violation_checks_body_length() {
        let mut short = ShortScript {
            hook: "H".into(),
            body: vec!["a".into(), "b".into()],
            cta: "C".into(),
        };
        assert_eq!(short.shape_violation().as_deref(), Some("body has 2 lines, expected 3-6"));
        short.body.push("c".into());
        assert_eq!(short.shape_violation(), None);
        short.hook = " ".into();
        assert_eq!(short.shape_violation().as_deref(), Some("empty hook"));
    }
}
