//! Signal records and their classified view-models.
//!
//! [`RawSignal`] is the JSON shape served by the signal API. [`SignalView`]
//! is the decorated tree built from it on every fetch. Both implement
//! [`Classified`], so classification is always computed from the current
//! value rather than stored.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A signal record as returned by `/api/signal/all` and `/api/signal/{id}/full`.
///
/// Fields the dashboard does not know about are kept in `extra` and written
/// back unchanged on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    /// Signal identifier. The API may send it as a string or an integer.
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Health value in `[0, 1]`. `None` means the status is undefined.
    #[serde(default)]
    pub value: Option<f64>,

    /// Signals this one depends on, in API order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<RawSignal>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

/// The single class a signal falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Success,
    /// No value reported. Answers `is_warning() == true`.
    Undefined,
    Warning,
    Error,
    /// A value outside every range (for example `1.2`).
    Unclassified,
}

impl Classification {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Classification::Success => "OK",
            Classification::Undefined => "UNDEF",
            Classification::Warning => "WARN",
            Classification::Error => "ERR",
            Classification::Unclassified => "??",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Success => "Success",
            Classification::Undefined => "Undefined",
            Classification::Warning => "Warning",
            Classification::Error => "Error",
            Classification::Unclassified => "Unclassified",
        }
    }
}

/// Display form of a signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattedValue {
    Undefined,
    /// `round(value * 100)`.
    Percent(i64),
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedValue::Undefined => f.write_str("Undefined"),
            FormattedValue::Percent(p) => write!(f, "{}", p),
        }
    }
}

/// Classification accessors shared by raw records and view-models.
///
/// The thresholds are not complementary: `0.5` is an error, values above `1`
/// match nothing, and an absent value counts as a warning.
pub trait Classified {
    fn value(&self) -> Option<f64>;

    fn has_dependencies(&self) -> bool;

    /// Value present and `<= 0.5`.
    fn is_error(&self) -> bool {
        matches!(self.value(), Some(v) if v <= 0.5)
    }

    /// Value absent, or strictly between `0.5` and `1`.
    fn is_warning(&self) -> bool {
        match self.value() {
            None => true,
            Some(v) => v > 0.5 && v < 1.0,
        }
    }

    /// Value exactly `1`.
    fn is_success(&self) -> bool {
        self.value() == Some(1.0)
    }

    fn formatted_value(&self) -> FormattedValue {
        match self.value() {
            None => FormattedValue::Undefined,
            Some(v) => FormattedValue::Percent(round_half_up(v * 100.0) as i64),
        }
    }

    fn classification(&self) -> Classification {
        match self.value() {
            None => Classification::Undefined,
            Some(_) if self.is_error() => Classification::Error,
            Some(_) if self.is_success() => Classification::Success,
            Some(_) if self.is_warning() => Classification::Warning,
            Some(_) => Classification::Unclassified,
        }
    }
}

// Halves round toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

impl Classified for RawSignal {
    fn value(&self) -> Option<f64> {
        self.value
    }

    fn has_dependencies(&self) -> bool {
        self.dependencies.as_ref().is_some_and(|deps| !deps.is_empty())
    }
}

/// A signal decorated for display, with every dependency decorated too.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalView {
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub dependencies: Option<Vec<SignalView>>,
    pub extra: Map<String, Value>,
}

impl SignalView {
    /// Build the view-model for `raw` and, depth-first, all of its dependencies.
    pub fn from_raw(raw: RawSignal) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            value: raw.value,
            dependencies: raw
                .dependencies
                .map(|deps| deps.into_iter().map(SignalView::from_raw).collect()),
            extra: raw.extra,
        }
    }

    /// Dependencies in API order; empty when absent.
    pub fn dependencies(&self) -> &[SignalView] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    /// Name, falling back to the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().or(self.id.as_deref()).unwrap_or("(unnamed)")
    }

    /// Flatten the tree depth-first as `(depth, node)` pairs, root first.
    pub fn walk(&self) -> Vec<(usize, &SignalView)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a SignalView)>) {
        out.push((depth, self));
        for dep in self.dependencies() {
            dep.walk_into(depth + 1, out);
        }
    }

    /// Case-insensitive match against name and id.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        [self.name.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .any(|s| s.to_lowercase().contains(&needle))
    }

    /// JSON form carrying the original fields plus the derived ones.
    pub fn to_json(&self) -> Value {
        let mut obj = self.extra.clone();
        if let Some(ref id) = self.id {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(ref name) = self.name {
            obj.insert("name".to_string(), Value::String(name.clone()));
        }
        obj.insert("value".to_string(), serde_json::json!(self.value));
        obj.insert(
            "classification".to_string(),
            Value::String(self.classification().label().to_string()),
        );
        let formatted = match self.formatted_value() {
            FormattedValue::Undefined => Value::String("Undefined".to_string()),
            FormattedValue::Percent(p) => serde_json::json!(p),
        };
        obj.insert("formatted_value".to_string(), formatted);
        if let Some(ref deps) = self.dependencies {
            obj.insert(
                "dependencies".to_string(),
                Value::Array(deps.iter().map(SignalView::to_json).collect()),
            );
        }
        Value::Object(obj)
    }
}

impl Classified for SignalView {
    fn value(&self) -> Option<f64> {
        self.value
    }

    fn has_dependencies(&self) -> bool {
        !self.dependencies().is_empty()
    }
}

/// Decorate a whole `/api/signal/all` response, preserving order.
pub fn build_views(raw: Vec<RawSignal>) -> Vec<SignalView> {
    raw.into_iter().map(SignalView::from_raw).collect()
}
