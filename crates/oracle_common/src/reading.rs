//! The canonical oracle reading and its repair pass.
//!
//! Every reading the service returns satisfies the same contract: `odds` is
//! an integer in 0..=100, `short` and `long` are non-empty, and a `short`
//! that looks like a bare percentage always agrees with `odds`. Repair is
//! per field: a provider payload with one broken field keeps its usable
//! fields instead of being rejected wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Neutral narrative used whenever the provider gave nothing usable.
pub const NEUTRAL_LONG: &str =
    "The outcome balances on a knife-edge; ready yourself to tip the scales with purpose.";

const MISSING_CONFIG_ODDS: u8 = 61;
const MISSING_CONFIG_LONG: &str = "Conditions are favorable if you proceed with steady attention and tidy edges; small missteps could ripple larger than expected.";

const PROVIDER_ERROR_ODDS: u8 = 62;
const PROVIDER_ERROR_LONG: &str = "Currents are moving in your favor, but attention to small details will preserve the edge.";

/// Cap on raw provider excerpts and error messages carried in diagnostics.
pub const DIAGNOSTIC_RAW_CAP: usize = 400;

/// A complete three-field reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub short: String,
    pub long: String,
    pub odds: u8,
}

impl Reading {
    /// All-default reading: the shared fallback for unusable envelopes and
    /// unparseable content.
    pub fn neutral() -> Self {
        Self {
            short: "50%".to_string(),
            long: NEUTRAL_LONG.to_string(),
            odds: 50,
        }
    }

    /// Fixed reading served when no provider credential is configured.
    pub fn missing_config() -> Self {
        Self {
            short: format!("{MISSING_CONFIG_ODDS}%"),
            long: MISSING_CONFIG_LONG.to_string(),
            odds: MISSING_CONFIG_ODDS,
        }
    }

    /// Fixed reading served when the provider call fails.
    pub fn provider_error() -> Self {
        Self {
            short: format!("{PROVIDER_ERROR_ODDS}%"),
            long: PROVIDER_ERROR_LONG.to_string(),
            odds: PROVIDER_ERROR_ODDS,
        }
    }

    /// Parse generated content and repair each field independently.
    ///
    /// Anything that is not a JSON object degrades to [`Reading::neutral`].
    /// Already-valid content passes through unmodified.
    pub fn repair(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(fields)) => {
                let odds = repair_odds(fields.get("odds"));
                Self {
                    short: repair_short(fields.get("short"), odds),
                    long: repair_long(fields.get("long")),
                    odds,
                }
            }
            _ => Self::neutral(),
        }
    }
}

/// Coerce odds to a finite number, then clamp to 0..=100 and round.
fn repair_odds(value: Option<&Value>) -> u8 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => n.clamp(0.0, 100.0).round() as u8,
        _ => 50,
    }
}

/// Non-strings and empty strings synthesize from odds. A bare percentage is
/// rewritten to agree with the repaired odds even when the provider supplied
/// an internally inconsistent pair.
fn repair_short(value: Option<&Value>, odds: u8) -> String {
    let short = match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return format!("{odds}%"),
    };
    if is_bare_percentage(&short) {
        format!("{odds}%")
    } else {
        short
    }
}

fn repair_long(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => NEUTRAL_LONG.to_string(),
    }
}

/// One to three ASCII digits followed by a percent sign, nothing else.
fn is_bare_percentage(s: &str) -> bool {
    match s.strip_suffix('%') {
        Some(digits) => {
            !digits.is_empty() && digits.len() <= 3 && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Advisory debugging context attached only on degraded outcomes. Never part
/// of the contract; clients should ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Failure site: "config" or "provider".
    #[serde(rename = "where")]
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Diagnostic {
    pub fn config(message: &str) -> Self {
        Self {
            site: "config".to_string(),
            status: None,
            raw: None,
            message: Some(excerpt(message)),
        }
    }

    pub fn provider_status(status: u16, raw_body: &str) -> Self {
        Self {
            site: "provider".to_string(),
            status: Some(status),
            raw: Some(excerpt(raw_body)),
            message: None,
        }
    }

    pub fn provider_transport(message: &str) -> Self {
        Self {
            site: "provider".to_string(),
            status: None,
            raw: None,
            message: Some(excerpt(message)),
        }
    }
}

fn excerpt(raw: &str) -> String {
    raw.chars().take(DIAGNOSTIC_RAW_CAP).collect()
}

/// Wire shape of the reading endpoint: the reading fields flattened to the
/// top level, plus the optional diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingResponse {
    #[serde(flatten)]
    pub reading: Reading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Diagnostic>,
}

impl ReadingResponse {
    pub fn ok(reading: Reading) -> Self {
        Self {
            reading,
            debug: None,
        }
    }

    pub fn degraded(reading: Reading, debug: Diagnostic) -> Self {
        Self {
            reading,
            debug: Some(debug),
        }
    }
}
