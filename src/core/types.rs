//! RU-001: Recipe schema types and generated artifact types.
//!
//! Recipes are deserialized only after every mapping key has been
//! lowercased (see `normalize`), so all serde field names here are the
//! lowercase forms of the Greengrass recipe keys.
//!
//! Objects that the recipe format defines as mappings (dependency metadata,
//! manifests, platforms, structured phases) go through [`Fields`], which
//! rejects every other YAML shape. serde's derived struct visitors would
//! otherwise fill fields positionally from a sequence.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};
use std::fmt;

// ============================================================================
// Recipe
// ============================================================================

/// Root recipe document.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Component name, used for every generated file name
    pub componentname: String,

    /// Human-readable description (becomes `Description=`)
    pub componentdescription: String,

    /// Optional component version (informational)
    #[serde(default)]
    pub componentversion: Option<String>,

    /// Dependencies on other components, in declaration order
    #[serde(default)]
    pub componentdependencies: Option<IndexMap<String, Option<DependencyMeta>>>,

    /// Per-platform manifests
    pub manifests: Vec<Manifest>,

    /// Named lifecycle selections referenced by manifests
    #[serde(default)]
    pub lifecycle: Option<IndexMap<String, SelectionEntry>>,
}

impl Recipe {
    /// Dependencies in declaration order. Absent and empty are the same.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, Option<&DependencyMeta>)> {
        self.componentdependencies
            .iter()
            .flat_map(|deps| deps.iter())
            .map(|(name, meta)| (name.as_str(), meta.as_ref()))
    }

    /// Look up a named selection in the top-level lifecycle mapping.
    pub fn selection(&self, name: &str) -> Option<&Lifecycle> {
        match self.lifecycle.as_ref()?.get(name)? {
            SelectionEntry::Lifecycle(lifecycle) => Some(lifecycle),
            SelectionEntry::Other(_) => None,
        }
    }
}

/// Value under a selection name in the top-level lifecycle mapping.
///
/// Anything that is not a mapping resolves to no lifecycle at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Value")]
pub enum SelectionEntry {
    Lifecycle(Lifecycle),
    Other(Value),
}

impl TryFrom<Value> for SelectionEntry {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        if value.is_mapping() {
            serde_yaml_ng::from_value(value).map(Self::Lifecycle).map_err(|e| e.to_string())
        } else {
            Ok(Self::Other(value))
        }
    }
}

// ============================================================================
// Dependencies
// ============================================================================

/// Metadata attached to a single component dependency.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct DependencyMeta {
    /// "HARD" or "SOFT" (any casing); anything but hard is soft
    pub dependencytype: Option<String>,

    /// Semver range; parsed but not translated into the unit
    pub versionrequirement: Option<String>,
}

impl TryFrom<Value> for DependencyMeta {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        let fields = Fields::new(value, "dependency metadata")?;
        Ok(Self {
            dependencytype: fields.get("dependencytype")?,
            versionrequirement: fields.get("versionrequirement")?,
        })
    }
}

impl DependencyMeta {
    pub fn kind(&self) -> DependencyKind {
        match self.dependencytype.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("hard") => DependencyKind::Hard,
            _ => DependencyKind::Soft,
        }
    }
}

/// Dependency strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Hard,
    Soft,
}

/// One ordering line in the `[Unit]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingClause {
    /// Strong ordering: `After=<name>.service`
    After(String),
    /// Best-effort ordering: `Wants=<name>.service`
    Wants(String),
}

impl OrderingClause {
    pub fn target(&self) -> &str {
        match self {
            Self::After(t) | Self::Wants(t) => t,
        }
    }
}

impl fmt::Display for OrderingClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::After(t) => write!(f, "After={}", t),
            Self::Wants(t) => write!(f, "Wants={}", t),
        }
    }
}

// ============================================================================
// Manifests
// ============================================================================

/// A per-platform manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct Manifest {
    pub platform: Option<Platform>,

    /// Embedded lifecycle
    pub lifecycle: Option<Lifecycle>,

    /// Names pointing into the recipe's top-level lifecycle mapping
    pub selections: Option<Vec<String>>,
}

impl TryFrom<Value> for Manifest {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        let fields = Fields::new(value, "manifest")?;
        Ok(Self {
            platform: fields.get("platform")?,
            lifecycle: fields.get("lifecycle")?,
            selections: fields.get("selections")?,
        })
    }
}

impl Manifest {
    /// OS identifier; absent platform or absent os reads as "".
    pub fn os(&self) -> &str {
        self.platform
            .as_ref()
            .and_then(|p| p.os.as_deref())
            .unwrap_or("")
    }
}

/// Platform descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct Platform {
    pub os: Option<String>,
    pub architecture: Option<String>,
}

impl TryFrom<Value> for Platform {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        let fields = Fields::new(value, "platform")?;
        Ok(Self {
            os: fields.get("os")?,
            architecture: fields.get("architecture")?,
        })
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle mapping: phase name → phase definition, plus shared environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lifecycle {
    /// Environment shared by every phase
    #[serde(default)]
    pub setenv: Option<IndexMap<String, Value>>,

    #[serde(flatten)]
    pub phases: IndexMap<String, PhaseDef>,
}

impl Lifecycle {
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.setenv.as_ref().is_none_or(|e| e.is_empty())
    }

    pub fn phase(&self, name: &str) -> Option<&PhaseDef> {
        self.phases.get(name)
    }
}

/// A phase is either a bare command or a structured step.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Value")]
pub enum PhaseDef {
    /// Command text; numbers and booleans are taken as their text
    Command(String),
    Step(PhaseStep),
    /// Null
    Empty,
}

impl PhaseDef {
    /// Absent-equivalent: null, or an empty command.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Command(s) => s.is_empty(),
            Self::Step(_) => false,
            Self::Empty => true,
        }
    }
}

impl TryFrom<Value> for PhaseDef {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::String(s) => Ok(Self::Command(s)),
            scalar @ (Value::Bool(_) | Value::Number(_)) => {
                Ok(Self::Command(yaml_value_to_string(&scalar)))
            }
            mapping @ Value::Mapping(_) => PhaseStep::try_from(mapping).map(Self::Step),
            other => Err(format!(
                "lifecycle phase must be a command string or a mapping, found {}",
                shape(&other)
            )),
        }
    }
}

/// Structured phase definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct PhaseStep {
    pub script: Option<String>,
    pub requiresprivilege: Option<Value>,
    pub setenv: Option<IndexMap<String, Value>>,
}

impl TryFrom<Value> for PhaseStep {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, String> {
        let fields = Fields::new(value, "lifecycle phase")?;
        Ok(Self {
            script: fields.get("script")?,
            requiresprivilege: fields.get("requiresprivilege")?,
            setenv: fields.get("setenv")?,
        })
    }
}

// ============================================================================
// Mapping-only objects
// ============================================================================

/// Fields of a recipe object that must be written as a YAML mapping.
struct Fields(Mapping);

impl Fields {
    fn new(value: Value, what: &str) -> Result<Self, String> {
        match value {
            Value::Mapping(map) => Ok(Self(map)),
            other => Err(format!("{} must be a mapping, found {}", what, shape(&other))),
        }
    }

    /// Typed value of one field. Absent and null both read as `None`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_yaml_ng::from_value(v.clone())
                .map(Some)
                .map_err(|e| format!("{}: {}", key, e)),
        }
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ============================================================================
// Generated artifacts
// ============================================================================

/// A materialized lifecycle script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    /// `ggl.<component>.script.<phase>`
    pub file_name: String,
    pub phase: String,
    pub content: String,
}

/// The generated unit definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    /// `ggl.<component>.service`
    pub file_name: String,
    pub content: String,
}

/// Everything one invocation produces, in write order.
#[derive(Debug, Clone)]
pub struct Generation {
    pub component: String,
    pub scripts: Vec<ScriptFile>,
    /// `None` means unit generation was skipped
    pub unit: Option<UnitFile>,
}

// ============================================================================
// Value helpers
// ============================================================================

/// Convert a serde_yaml_ng::Value to a string for script and environment text.
pub fn yaml_value_to_string(val: &Value) -> String {
    match val {
        serde_yaml_ng::Value::String(s) => s.clone(),
        serde_yaml_ng::Value::Number(n) => n.to_string(),
        serde_yaml_ng::Value::Bool(b) => b.to_string(),
        serde_yaml_ng::Value::Null => String::new(),
        serde_yaml_ng::Value::Tagged(t) => yaml_value_to_string(&t.value),
        other => format!("{:?}", other),
    }
}

/// Truthiness for flags such as `requiresPrivilege`.
pub fn is_truthy(val: &Value) -> bool {
    match val {
        serde_yaml_ng::Value::Null => false,
        serde_yaml_ng::Value::Bool(b) => *b,
        serde_yaml_ng::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_yaml_ng::Value::String(s) => {
            let s = s.trim();
            !s.is_empty()
                && !["false", "no", "off", "0"]
                    .iter()
                    .any(|f| s.eq_ignore_ascii_case(f))
        }
        serde_yaml_ng::Value::Sequence(s) => !s.is_empty(),
        serde_yaml_ng::Value::Mapping(m) => !m.is_empty(),
        serde_yaml_ng::Value::Tagged(t) => is_truthy(&t.value),
    }
}

// ============================================================================
// Tests
// ============================================================================
