//! Submission validation: prompt, image payload decoding and the
//! caller-configured input cardinality rule.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Maximum prompt length in characters.
pub const MAX_PROMPT_LEN: usize = 8_000;

// ---------------------------------------------------------------------------
// Input cardinality
// ---------------------------------------------------------------------------

/// How many input images a submission must carry.
///
/// This is a deployment choice, not a property of the job model: different
/// poster layouts pair a different number of photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRule {
    /// Any count of at least one.
    #[default]
    Any,
    Exactly(usize),
    /// Inclusive range.
    Between(usize, usize),
}

impl InputRule {
    /// Parse a rule from its config form: `"3"` or `"3-6"`.
    /// An empty or absent value means [`InputRule::Any`].
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::Any);
        };

        let parse_count = |s: &str| {
            s.trim().parse::<usize>().map_err(|_| {
                CoreError::Validation(format!("Invalid image count rule '{raw}'"))
            })
        };

        let rule = match raw.split_once('-') {
            Some((min, max)) => Self::Between(parse_count(min)?, parse_count(max)?),
            None => Self::Exactly(parse_count(raw)?),
        };

        match rule {
            Self::Exactly(0) => Err(CoreError::Validation(
                "Image count rule must require at least one image".into(),
            )),
            Self::Between(min, max) if min == 0 || min > max => Err(CoreError::Validation(
                format!("Invalid image count range '{raw}'"),
            )),
            rule => Ok(rule),
        }
    }

    /// Check a submission's image count against the rule.
    pub fn check(self, count: usize) -> Result<(), CoreError> {
        if count == 0 {
            return Err(CoreError::Validation("At least one image is required".into()));
        }
        match self {
            Self::Any => Ok(()),
            Self::Exactly(n) if count == n => Ok(()),
            Self::Exactly(n) => Err(CoreError::Validation(format!(
                "Exactly {n} images are required, got {count}"
            ))),
            Self::Between(min, max) if (min..=max).contains(&count) => Ok(()),
            Self::Between(min, max) => Err(CoreError::Validation(format!(
                "Between {min} and {max} images are required, got {count}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate the generation prompt.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".into()));
    }
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds {MAX_PROMPT_LEN} characters"
        )));
    }
    Ok(())
}

/// Decode one base64 image payload.
///
/// Accepts either raw base64 or a `data:image/<type>;base64,` URI.
pub fn decode_image(index: usize, encoded: &str) -> Result<Vec<u8>, CoreError> {
    let data = strip_data_uri(encoded.trim());
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| CoreError::Validation(format!("Image {index} is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(CoreError::Validation(format!("Image {index} is empty")));
    }
    Ok(bytes)
}

fn strip_data_uri(encoded: &str) -> &str {
    encoded
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map_or(encoded, |(_, data)| data)
}
