//! Data Model: research descriptors, POI snapshots, webhook targets
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Research descriptors
// ============================================================================

/// A single scalar parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

/// A parameter value: either one scalar or an ordered list of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    List(Vec<ScalarValue>),
    Scalar(ScalarValue),
}

impl ParamValue {
    /// Build a list value
    pub fn list<T: Into<ScalarValue>>(values: impl IntoIterator<Item = T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Number of values carried (1 for a scalar)
    pub fn count(&self) -> usize {
        match self {
            ParamValue::List(values) => values.len(),
            ParamValue::Scalar(_) => 1,
        }
    }

    /// All values as a slice, a scalar being a one-element slice
    pub fn values(&self) -> &[ScalarValue] {
        match self {
            ParamValue::List(values) => values,
            ParamValue::Scalar(value) => std::slice::from_ref(value),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ParamValue::List(_))
    }
}

/// Lists render comma-joined without spaces
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Scalar(value) => write!(f, "{}", value),
            ParamValue::List(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<ScalarValue> for ParamValue {
    fn from(value: ScalarValue) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value.into())
    }
}

/// Parameters of a descriptor, keyed by parameter name
pub type ResearchParams = BTreeMap<String, ParamValue>;

/// Which half of a research task a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchKind {
    Objective,
    Reward,
}

impl ResearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchKind::Objective => "objective",
            ResearchKind::Reward => "reward",
        }
    }
}

impl fmt::Display for ResearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An objective or reward: a type plus its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchDescriptor {
    pub r#type: String,
    #[serde(default)]
    pub params: ResearchParams,
}

impl ResearchDescriptor {
    pub fn new(research_type: impl Into<String>) -> Self {
        Self {
            r#type: research_type.into(),
            params: ResearchParams::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

// ============================================================================
// Update events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The POI as it looks right after the research update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinates,
    pub objective: ResearchDescriptor,
    pub reward: ResearchDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// A person using the map UI
    #[default]
    User,
    /// An API client
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reporter {
    pub nickname: String,
    #[serde(default)]
    pub kind: ReporterKind,
}

impl Reporter {
    pub fn new(nickname: impl Into<String>, kind: ReporterKind) -> Self {
        Self {
            nickname: nickname.into(),
            kind,
        }
    }

    /// Interactive callers may not use free-text research matching
    pub fn is_interactive(&self) -> bool {
        self.kind == ReporterKind::User
    }
}

/// One research update. `reported_at` is captured once and shared by every
/// notification sent for the update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchEvent {
    pub reporter: Reporter,
    pub poi: PoiSnapshot,
    pub reported_at: DateTime<Utc>,
}

// ============================================================================
// Webhook targets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Generic JSON webhook
    #[serde(alias = "json")]
    Generic,
    Telegram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Whitelist,
    Blacklist,
}

/// Objective or reward requirements of a target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchFilter {
    #[serde(default)]
    pub requirements: Vec<ResearchDescriptor>,
    #[serde(default)]
    pub mode: FilterMode,
}

impl ResearchFilter {
    pub fn whitelist(requirements: Vec<ResearchDescriptor>) -> Self {
        Self {
            requirements,
            mode: FilterMode::Whitelist,
        }
    }

    pub fn blacklist(requirements: Vec<ResearchDescriptor>) -> Self {
        Self {
            requirements,
            mode: FilterMode::Blacklist,
        }
    }
}

/// Telegram message formatting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[serde(alias = "md")]
    Markdown,
    Html,
    #[default]
    #[serde(alias = "txt")]
    Plain,
}

impl ParseMode {
    /// Value of the `parse_mode` field of a sendMessage call
    pub fn api_name(&self) -> Option<&'static str> {
        match self {
            ParseMode::Markdown => Some("Markdown"),
            ParseMode::Html => Some("HTML"),
            ParseMode::Plain => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramOptions {
    #[serde(default)]
    pub parse_mode: ParseMode,
    #[serde(default)]
    pub disable_web_page_preview: bool,
    #[serde(default)]
    pub disable_notification: bool,
    /// Bot token as stored by the credential store
    #[serde(default)]
    pub bot_token: String,
}

fn default_true() -> bool {
    true
}

/// A configured notification target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookTarget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Target URL, or `tg://send?to=<chat id>` for Telegram
    pub target: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub icons: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default = "default_true")]
    pub show_species: bool,
    #[serde(default)]
    pub geofence: Option<String>,
    #[serde(default)]
    pub objectives: ResearchFilter,
    #[serde(default)]
    pub rewards: ResearchFilter,
    pub body: String,
    #[serde(default)]
    pub telegram: TelegramOptions,
}

impl WebhookTarget {
    /// A generic JSON target with no filters
    pub fn generic(id: impl Into<String>, target: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TargetKind::Generic,
            active: true,
            target: target.into(),
            language: None,
            icons: None,
            species: None,
            show_species: true,
            geofence: None,
            objectives: ResearchFilter::default(),
            rewards: ResearchFilter::default(),
            body: body.into(),
            telegram: TelegramOptions::default(),
        }
    }

    /// A Telegram target with no filters
    pub fn telegram(
        id: impl Into<String>,
        target: impl Into<String>,
        body: impl Into<String>,
        options: TelegramOptions,
    ) -> Self {
        Self {
            kind: TargetKind::Telegram,
            telegram: options,
            ..Self::generic(id, target, body)
        }
    }

    pub fn with_objectives(mut self, filter: ResearchFilter) -> Self {
        self.objectives = filter;
        self
    }

    pub fn with_rewards(mut self, filter: ResearchFilter) -> Self {
        self.rewards = filter;
        self
    }

    pub fn with_geofence(mut self, geofence: impl Into<String>) -> Self {
        self.geofence = Some(geofence.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Configured language, empty strings counting as unset
    pub fn language(&self) -> Option<&str> {
        non_empty(&self.language)
    }

    /// Configured icon set, empty strings counting as unset
    pub fn icon_set(&self) -> Option<&str> {
        non_empty(&self.icons)
    }

    /// Configured species icon set, empty strings counting as unset
    pub fn species_set(&self) -> Option<&str> {
        non_empty(&self.species)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
