//! Sounds attached to states, and the lenient sanitizer every sound passes
//! through on its way into the store.
//!
//! Sound fields are coerced, never rejected: wrong types become the closest
//! sensible value and unknown keys are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where the audio of a sound comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundFile {
    /// Path or data URI.
    Path(String),
    /// Structured file value handed over by the host, kept opaque.
    Data(Value),
}

/// An audio asset with playback parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sound {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<SoundFile>,
    pub volume: f64,
    pub backoff: f64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub speech: String,
}

impl Default for Sound {
    fn default() -> Self {
        Self {
            name: "New Sound".to_string(),
            file: None,
            volume: 1.0,
            backoff: 0.0,
            looping: false,
            speech: String::new(),
        }
    }
}

impl Sound {
    /// Build a sound from loosely typed fields alone.
    ///
    /// Every recognized field is coerced, so a missing one normalizes to the
    /// empty string, `false` or `0.0` rather than to [`Sound::default`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use phonebook_editor::core::Sound;
    /// use serde_json::json;
    ///
    /// let sound = Sound::from_fields(&json!({
    ///     "name": 42,
    ///     "volume": "0.5",
    ///     "loop": 1,
    ///     "colour": "blue",
    /// }));
    ///
    /// assert_eq!(sound.name, "42");
    /// assert_eq!(sound.volume, 0.5);
    /// assert!(sound.looping);
    /// ```
    pub fn from_fields(fields: &Value) -> Self {
        match fields {
            Value::Object(fields) => sanitize_sound(fields),
            _ => sanitize_sound(&Map::new()),
        }
    }

    /// Overlay loosely typed fields over this sound and sanitize the result.
    pub fn merged(&self, fields: &Value) -> Self {
        let mut combined = self.to_fields();
        if let Value::Object(patch) = fields {
            for (key, value) in patch {
                combined.insert(key.clone(), value.clone());
            }
        }
        sanitize_sound(&combined)
    }

    /// Run this sound through [`sanitize_sound`], e.g. after loading it.
    pub fn sanitized(&self) -> Self {
        sanitize_sound(&self.to_fields())
    }

    fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        }
    }
}

/// Coerce every recognized field to its expected type and drop the rest.
///
/// A `file` survives only as a non-empty string or a non-null structured
/// value; setting it to the empty string clears it.
pub fn sanitize_sound(fields: &Map<String, Value>) -> Sound {
    let field = |key: &str| fields.get(key).unwrap_or(&Value::Null);

    let file = match field("file") {
        Value::String(path) if !path.is_empty() => Some(SoundFile::Path(path.clone())),
        Value::Object(_) | Value::Array(_) => Some(SoundFile::Data(field("file").clone())),
        _ => None,
    };

    Sound {
        name: to_str(field("name")),
        file,
        volume: to_finite_float(field("volume")),
        backoff: to_finite_float(field("backoff")),
        looping: to_bool(field("loop")),
        speech: to_str(field("speech")),
    }
}

pub(crate) fn to_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

pub(crate) fn to_finite_float(value: &Value) -> f64 {
    let float = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if float.is_finite() {
        float
    } else {
        0.0
    }
}
