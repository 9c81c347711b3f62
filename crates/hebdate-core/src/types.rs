//! Core data types: the normalized lookup result and the raw converter payload.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A successfully converted Hebrew date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HebrewDate {
    /// Date in Hebrew script, e.g. `"א׳ בְּטֵבֵת תשפ״ה"`.
    pub hebrew: String,
    /// Latin rendering in `"<day> <month> <year>"` form, e.g. `"1 Tevet 5785"`.
    pub transliterated: String,
    /// Holidays and events falling on the date, in upstream order.
    pub events: Vec<String>,
}

/// Outcome of a Hebrew date lookup.
///
/// Every failure mode of a lookup is captured as [`HebrewDateResult::Failure`]
/// so a presenter can render a fallback without inspecting error types.
///
/// ## Serialization
///
/// Serializes to a flat record with a `success` flag, which is also the form
/// stored in the cache:
///
/// ```rust
/// use hebdate_core::{HebrewDate, HebrewDateResult};
///
/// let result = HebrewDateResult::Success(HebrewDate {
///     hebrew: "א׳ בְּטֵבֵת תשפ״ה".to_string(),
///     transliterated: "1 Tevet 5785".to_string(),
///     events: vec![],
/// });
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["transliterated"], "1 Tevet 5785");
///
/// let failed = HebrewDateResult::failure("API returned status code 500");
/// let json = serde_json::to_value(&failed).unwrap();
/// assert_eq!(json["success"], false);
/// assert_eq!(json["error"], "API returned status code 500");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultRecord", try_from = "ResultRecord")]
pub enum HebrewDateResult {
    /// A usable date was obtained, from cache or network.
    Success(HebrewDate),
    /// No usable date; carries a human-readable reason.
    Failure {
        /// Failure description, suitable for logs rather than end users.
        error: String,
    },
}

impl HebrewDateResult {
    /// Build a failed result from any displayable reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// Whether a usable date was obtained.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The converted date, when the lookup succeeded.
    #[must_use]
    pub const fn date(&self) -> Option<&HebrewDate> {
        match self {
            Self::Success(date) => Some(date),
            Self::Failure { .. } => None,
        }
    }

    /// Hebrew-script text, present only on success.
    #[must_use]
    pub fn hebrew_text(&self) -> Option<&str> {
        self.date().map(|d| d.hebrew.as_str())
    }

    /// Transliterated text, present only on success.
    #[must_use]
    pub fn transliterated_text(&self) -> Option<&str> {
        self.date().map(|d| d.transliterated.as_str())
    }

    /// Events for the day; empty on failure.
    #[must_use]
    pub fn events(&self) -> &[String] {
        self.date().map_or(&[], |d| d.events.as_slice())
    }

    /// Failure reason, present only on failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl From<Error> for HebrewDateResult {
    fn from(err: Error) -> Self {
        Self::failure(err.to_string())
    }
}

/// Flat on-the-wire shape of [`HebrewDateResult`].
#[derive(Serialize, Deserialize)]
struct ResultRecord {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hebrew: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transliterated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<HebrewDateResult> for ResultRecord {
    fn from(result: HebrewDateResult) -> Self {
        match result {
            HebrewDateResult::Success(date) => Self {
                success: true,
                hebrew: Some(date.hebrew),
                transliterated: Some(date.transliterated),
                events: Some(date.events),
                error: None,
            },
            HebrewDateResult::Failure { error } => Self {
                success: false,
                hebrew: None,
                transliterated: None,
                events: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<ResultRecord> for HebrewDateResult {
    type Error = String;

    fn try_from(record: ResultRecord) -> std::result::Result<Self, Self::Error> {
        if !record.success {
            return Ok(Self::Failure {
                error: record.error.unwrap_or_default(),
            });
        }
        let hebrew = record
            .hebrew
            .ok_or_else(|| "successful record is missing `hebrew`".to_string())?;
        Ok(Self::Success(HebrewDate {
            hebrew,
            transliterated: record.transliterated.unwrap_or_default(),
            events: record.events.unwrap_or_default(),
        }))
    }
}

/// Raw converter response body.
///
/// Only the fields used for normalization are captured; anything else the
/// service sends (`gy`, `gm`, `heDateParts`, ...) is ignored. Everything but
/// `hebrew` is read leniently so an odd field never costs the whole date:
/// numeric fields accept numbers and numeric strings (anything else is 0),
/// the month accepts text or numbers, and events keep only their scalar
/// entries.
#[derive(Debug, Default, Deserialize)]
pub struct ConverterResponse {
    /// Date in Hebrew script.
    #[serde(default)]
    pub hebrew: Option<String>,
    /// Day of the Hebrew month.
    #[serde(default, deserialize_with = "lenient_int")]
    pub hd: Option<i64>,
    /// Transliterated month name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub hm: Option<String>,
    /// Hebrew year.
    #[serde(default, deserialize_with = "lenient_int")]
    pub hy: Option<i64>,
    /// Holidays and events for the date.
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Option<Vec<String>>,
}

impl ConverterResponse {
    /// Parse a response body.
    ///
    /// Anything that is not a JSON object, or an object without a `hebrew`
    /// string, is [`Error::InvalidResponse`].
    pub fn parse(body: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|_| Error::InvalidResponse)?;
        if !value.is_object() {
            return Err(Error::InvalidResponse);
        }
        let response: Self = serde_json::from_value(value).map_err(|_| Error::InvalidResponse)?;
        if response.hebrew.is_none() {
            return Err(Error::InvalidResponse);
        }
        Ok(response)
    }

    /// Normalize into a [`HebrewDate`].
    pub fn into_hebrew_date(self) -> Result<HebrewDate> {
        let transliterated = transliterate(self.hd, self.hm.as_deref(), self.hy);
        let hebrew = self.hebrew.ok_or(Error::InvalidResponse)?;
        Ok(HebrewDate {
            hebrew,
            transliterated,
            events: self.events.unwrap_or_default(),
        })
    }
}

/// Format `"<day> <month> <year>"`, defaulting day/year to 0 and month to "".
///
/// With every part missing this yields `"0  0"`.
#[must_use]
pub fn transliterate(day: Option<i64>, month: Option<&str>, year: Option<i64>) -> String {
    format!(
        "{} {} {}",
        day.unwrap_or(0),
        month.unwrap_or(""),
        year.unwrap_or(0)
    )
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => Some(
            n.as_i64()
                // Truncate like an integer cast.
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
        ),
        serde_json::Value::String(s) => Some(leading_int(&s)),
        serde_json::Value::Bool(b) => Some(i64::from(b)),
        _ => Some(0),
    }))
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn lenient_events<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => {
            Some(items.into_iter().filter_map(scalar_text).collect())
        },
        _ => None,
    })
}

fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer prefix of a string (`"12abc"` → 12, `"abc"` → 0).
fn leading_int(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_response_normalizes() {
        let body = r#"{"hebrew": "א׳ בְּטֵבֵת תשפ״ה", "hd": 1, "hm": "Tevet", "hy": 5785, "events": ["Rosh Chodesh Tevet"]}"#;
        let date = ConverterResponse::parse(body)
            .unwrap()
            .into_hebrew_date()
            .unwrap();

        assert_eq!(date.hebrew, "א׳ בְּטֵבֵת תשפ״ה");
        assert_eq!(date.transliterated, "1 Tevet 5785");
        assert_eq!(date.events, vec!["Rosh Chodesh Tevet".to_string()]);
    }

    #[test]
    fn test_missing_parts_yield_degenerate_transliteration() {
        let date = ConverterResponse::parse(r#"{"hebrew": "x"}"#)
            .unwrap()
            .into_hebrew_date()
            .unwrap();
        assert_eq!(date.transliterated, "0  0");
        assert!(date.events.is_empty());
    }

    #[test]
    fn test_non_object_bodies_are_invalid() {
        for body in ["not json", "\"not json\"", "[1,2,3]", "42", "null", ""] {
            assert!(
                matches!(ConverterResponse::parse(body), Err(Error::InvalidResponse)),
                "body {body:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_object_without_hebrew_is_invalid() {
        let result = ConverterResponse::parse(r#"{"hd": 1, "hm": "Tevet", "hy": 5785}"#);
        assert!(matches!(result, Err(Error::InvalidResponse)));

        let result = ConverterResponse::parse(r#"{"hebrew": null}"#);
        assert!(matches!(result, Err(Error::InvalidResponse)));
    }

    #[test]
    fn test_numeric_fields_are_read_leniently() {
        let response =
            ConverterResponse::parse(r#"{"hebrew": "x", "hd": "14", "hm": "Adar II", "hy": 5784.0}"#)
                .unwrap();
        assert_eq!(response.hd, Some(14));
        assert_eq!(response.hy, Some(5784));

        let response = ConverterResponse::parse(r#"{"hebrew": "x", "hd": "abc"}"#).unwrap();
        assert_eq!(response.hd, Some(0));
    }

    #[test]
    fn test_odd_month_and_events_keep_the_date() {
        let body = r#"{"hebrew": "x", "hd": 1, "hm": {"name": "Tevet"}, "hy": 5785,
            "events": ["Rosh Chodesh Tevet", 8, null, {"title": "?"}, ["nested"]]}"#;
        let date = ConverterResponse::parse(body)
            .unwrap()
            .into_hebrew_date()
            .unwrap();
        assert_eq!(date.hebrew, "x");
        assert_eq!(date.transliterated, "1  5785");
        assert_eq!(date.events, vec!["Rosh Chodesh Tevet".to_string(), "8".to_string()]);

        let date = ConverterResponse::parse(r#"{"hebrew": "x", "hm": 7, "events": "Purim"}"#)
            .unwrap()
            .into_hebrew_date()
            .unwrap();
        assert_eq!(date.transliterated, "0 7 0");
        assert!(date.events.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body = r#"{"gy": 2024, "gm": 12, "gd": 2, "hebrew": "x", "heDateParts": {"y": "תשפ״ה"}}"#;
        assert!(ConverterResponse::parse(body).is_ok());
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("12abc"), 12);
        assert_eq!(leading_int("  -3"), -3);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
    }

    #[test]
    fn test_result_accessors() {
        let ok = HebrewDateResult::Success(HebrewDate {
            hebrew: "h".to_string(),
            transliterated: "1 Tevet 5785".to_string(),
            events: vec!["Chanukah: 8 Candles".to_string()],
        });
        assert!(ok.is_success());
        assert_eq!(ok.hebrew_text(), Some("h"));
        assert_eq!(ok.transliterated_text(), Some("1 Tevet 5785"));
        assert_eq!(ok.events().len(), 1);
        assert_eq!(ok.error_message(), None);

        let failed = HebrewDateResult::from(Error::InvalidResponse);
        assert!(!failed.is_success());
        assert_eq!(failed.hebrew_text(), None);
        assert!(failed.events().is_empty());
        assert_eq!(failed.error_message(), Some("Invalid API response format"));
    }

    #[test]
    fn test_cached_record_shape_is_preserved() {
        let json = r#"{"success":true,"hebrew":"h","transliterated":"1 Tevet 5785","events":[]}"#;
        let result: HebrewDateResult = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&result).unwrap(), json);
    }

    #[test]
    fn test_successful_record_without_hebrew_is_rejected() {
        let json = r#"{"success":true,"transliterated":"1 Tevet 5785"}"#;
        assert!(serde_json::from_str::<HebrewDateResult>(json).is_err());
    }

    proptest! {
        #[test]
        fn test_transliteration_layout(day in 0i64..=30, month in "[A-Za-z ]{0,12}", year in 5000i64..=6000) {
            let text = transliterate(Some(day), Some(&month), Some(year));
            let expected_prefix = format!("{day} ");
            let expected_suffix = format!(" {year}");
            prop_assert!(text.starts_with(&expected_prefix));
            prop_assert!(text.ends_with(&expected_suffix));
            prop_assert_eq!(text.len(), expected_prefix.len() + month.len() + expected_suffix.len());
        }
    }
}
