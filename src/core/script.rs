//! RU-006: Lifecycle script materialization.
//!
//! Extracts the command text of one lifecycle phase. Whether the phase asked
//! for root is returned alongside the text instead of being kept as process
//! state, so callers decide how privilege flows into the unit.

use super::types::{is_truthy, yaml_value_to_string, Lifecycle, PhaseDef, ScriptFile};
use indexmap::IndexMap;

/// Command text and flags for one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseScript {
    pub command: String,
    pub requires_privilege: bool,
    /// Phase-level `setenv`, rendered to strings
    pub env: IndexMap<String, String>,
}

/// Deterministic script file name: `ggl.<component>.script.<phase>`.
pub fn script_file_name(component: &str, phase: &str) -> String {
    format!("ggl.{}.script.{}", component, phase)
}

/// Extract a phase. Absent phases (or an absent lifecycle) give empty text.
pub fn materialize(lifecycle: Option<&Lifecycle>, phase: &str) -> PhaseScript {
    match lifecycle.and_then(|l| l.phase(phase)) {
        None | Some(PhaseDef::Empty) => PhaseScript::default(),
        Some(PhaseDef::Command(cmd)) => PhaseScript {
            command: cmd.clone(),
            ..PhaseScript::default()
        },
        Some(PhaseDef::Step(step)) => PhaseScript {
            command: step.script.clone().unwrap_or_default(),
            requires_privilege: step.requiresprivilege.as_ref().is_some_and(is_truthy),
            env: render_env(step.setenv.as_ref()),
        },
    }
}

/// Wrap a phase's text as a script file for the component.
pub fn script_file(component: &str, phase: &str, script: &PhaseScript) -> ScriptFile {
    ScriptFile {
        file_name: script_file_name(component, phase),
        phase: phase.to_string(),
        content: script.command.clone(),
    }
}

/// Environment for the run phase: lifecycle-wide `setenv`, overridden by
/// the phase's own.
pub fn merged_env(lifecycle: Option<&Lifecycle>, phase: &PhaseScript) -> IndexMap<String, String> {
    let mut env = render_env(lifecycle.and_then(|l| l.setenv.as_ref()));
    for (k, v) in &phase.env {
        env.insert(k.clone(), v.clone());
    }
    env
}

// Names were lowercased with the rest of the recipe; environment names are
// conventionally uppercase.
fn render_env(env: Option<&IndexMap<String, serde_yaml_ng::Value>>) -> IndexMap<String, String> {
    env.map(|e| {
        e.iter()
            .map(|(k, v)| (k.to_uppercase(), yaml_value_to_string(v)))
            .collect()
    })
    .unwrap_or_default()
}
