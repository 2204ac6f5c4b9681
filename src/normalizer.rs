//! Response normalization
//!
//! Backends answer with differently shaped JSON depending on the module and
//! the model behind them. Everything is mapped here, at one boundary, onto
//! a single canonical payload. The mapping never fails: a body with nothing
//! usable produces [`FALLBACK_TEXT`].
//!
//! Text precedence, first present non-empty candidate wins:
//!
//! 1. the module's own nested field (`plan.text`, `assets.text`,
//!    `development.text`, or a bare string in that field)
//! 2. `output.text`
//! 3. `text`
//! 4. `content`
//! 5. asset generation only: `assets.imageUrl` (the text is then empty and
//!    the media carries the reply)

use crate::backend::TaskKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text used when no candidate field is present
pub const FALLBACK_TEXT: &str = "Unable to retrieve response content";

/// Generated artifact attached to an assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Location of the artifact
    pub url: String,
    /// Backend's own flag saying the artifact should be shown
    pub present: bool,
}

/// Canonical assistant payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPayload {
    /// Reply text
    pub text: String,
    /// Optional generated media
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl NormalizedPayload {
    /// Payload carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }
}

/// Text held by a field, either bare or as `{ "text": ... }`
fn text_of(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("text").and_then(Value::as_str),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

/// JSON values that backends use to mean "set": anything but `null`,
/// `false`, `0` and `""`
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Lenient schema of every response shape seen from the backends
#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(default)]
    plan: Option<Value>,
    #[serde(default)]
    assets: Option<Value>,
    #[serde(default)]
    development: Option<Value>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<Value>,
    #[serde(default, rename = "hasImage")]
    has_image: Option<Value>,
}

impl RawResponse {
    fn parse(raw: &Value) -> Self {
        if !raw.is_object() {
            tracing::debug!("Backend response is not a JSON object; using fallback");
            return Self::default();
        }
        Self::deserialize(raw).unwrap_or_else(|e| {
            tracing::warn!("Unexpected backend response shape: {}", e);
            Self::default()
        })
    }

    fn task_field(&self, task: TaskKind) -> Option<&Value> {
        match task {
            TaskKind::Planning => self.plan.as_ref(),
            TaskKind::Assets => self.assets.as_ref(),
            TaskKind::Development => self.development.as_ref(),
        }
    }

    fn nested_asset(&self, key: &str) -> Option<&Value> {
        self.assets.as_ref().and_then(|a| a.get(key))
    }

    fn media(&self) -> Option<Media> {
        let url = non_empty_str(self.nested_asset("imageUrl"))
            .or_else(|| non_empty_str(self.image_url.as_ref()))?;

        let present = self.nested_asset("hasImage").is_some_and(is_truthy)
            || self.has_image.as_ref().is_some_and(is_truthy);

        Some(Media {
            url: url.to_string(),
            present,
        })
    }
}

/// Map a raw backend response onto the canonical payload
///
/// Deterministic and total: any JSON value yields exactly one payload.
///
/// # Examples
///
/// ```
/// use studiochat::backend::TaskKind;
/// use studiochat::normalizer::{normalize, FALLBACK_TEXT};
/// use serde_json::json;
///
/// let payload = normalize(TaskKind::Planning, &json!({"output": {"text": "A"}, "text": "B"}));
/// assert_eq!(payload.text, "A");
///
/// let payload = normalize(TaskKind::Planning, &json!({}));
/// assert_eq!(payload.text, FALLBACK_TEXT);
/// ```
pub fn normalize(task: TaskKind, raw: &Value) -> NormalizedPayload {
    let response = RawResponse::parse(raw);

    let text = text_of(response.task_field(task))
        .or_else(|| text_of(response.output.as_ref()))
        .or_else(|| text_of(response.text.as_ref()))
        .or_else(|| text_of(response.content.as_ref()))
        .map(str::to_string);

    let media = match task {
        TaskKind::Assets => response.media(),
        _ => None,
    };

    let text = match (text, &media) {
        (Some(text), _) => text,
        (None, Some(media)) if non_empty_str(response.nested_asset("imageUrl")).is_some() => {
            tracing::debug!(url = %media.url, "Asset response carries media only");
            String::new()
        }
        _ => {
            tracing::warn!(%task, "Could not extract response content");
            FALLBACK_TEXT.to_string()
        }
    };

    NormalizedPayload { text, media }
}
