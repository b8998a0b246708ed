//! RU-007: Unit assembly.
//!
//! Orchestrates a full recipe translation:
//! 1. `[Unit]` — description and one ordering clause per dependency
//! 2. `[Service]` — working directory, environment, `ExecStart` through the
//!    recipe runner, and root credentials when any phase asked for privilege
//! 3. `[Install]` — fixed `WantedBy=GreengrassCore.target`
//!
//! The install script of every applicable manifest is produced before its
//! run phase is checked, so a skipped unit still carries its install script.
//!
//! Recipe text never reaches the unit raw: the description is folded onto
//! one line, `%` is doubled wherever systemd expands specifiers, and
//! environment values and `ExecStart` words are C-escaped inside quotes.

use super::dependency::ordering_clauses;
use super::script::{materialize, merged_env, script_file, script_file_name};
use super::selector::{linux_manifests, resolve_lifecycle, select_run_phase};
use super::types::{Generation, OrderingClause, Recipe, UnitFile};
use crate::error::{Error, Result};
use clap::ValueEnum;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Target every generated unit is wanted by.
pub const WANTED_BY: &str = "GreengrassCore.target";

/// What to do when several manifests apply to Linux.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ManifestPolicy {
    /// Later applicable manifests replace earlier ones
    #[default]
    LastWins,
    /// More than one applicable manifest is a configuration error
    Reject,
}

/// Inputs that do not come from the recipe.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Absolute path of the recipe runner binary
    pub runner_path: PathBuf,
    /// Absolute directory the scripts will be written to
    pub script_dir: PathBuf,
    pub manifest_policy: ManifestPolicy,
}

/// Unit file name: `ggl.<component>.service`.
pub fn unit_file_name(component: &str) -> String {
    format!("ggl.{}.service", component)
}

/// Translate a recipe into scripts and (unless skipped) a unit file.
pub fn generate(recipe: &Recipe, opts: &GenerateOptions) -> Result<Generation> {
    let component = recipe.componentname.as_str();
    let applicable: Vec<_> = linux_manifests(recipe).collect();
    if opts.manifest_policy == ManifestPolicy::Reject && applicable.len() > 1 {
        return Err(Error::Configuration(format!(
            "{} manifests apply to linux; expected at most one",
            applicable.len()
        )));
    }

    let mut generation = Generation {
        component: component.to_string(),
        scripts: Vec::new(),
        unit: None,
    };
    let mut service = None;

    for manifest in applicable {
        let lifecycle = resolve_lifecycle(recipe, manifest)?;

        let install = materialize(lifecycle, "install");
        generation
            .scripts
            .push(script_file(component, "install", &install));

        let Some(phase) = select_run_phase(lifecycle) else {
            tracing::debug!(component = %component, "applicable manifest has no startup or run phase");
            return Ok(generation);
        };
        tracing::debug!(component = %component, phase = %phase, "selected run phase");

        let run = materialize(lifecycle, phase);
        generation.scripts.push(script_file(component, phase, &run));

        let env = merged_env(lifecycle, &run);
        let privileged = install.requires_privilege || run.requires_privilege;
        service = Some(service_section(component, phase, &env, privileged, opts));
    }

    if let Some(service) = service {
        let mut content = unit_section(recipe, &ordering_clauses(recipe));
        content.push_str(&service);
        content.push_str(&install_section());
        generation.unit = Some(UnitFile {
            file_name: unit_file_name(component),
            content,
        });
    }
    Ok(generation)
}

/// `[Unit]` section, terminated by a blank line.
pub fn unit_section(recipe: &Recipe, clauses: &[OrderingClause]) -> String {
    let mut lines = vec![
        "[Unit]".to_string(),
        format!("Description={}", description(&recipe.componentdescription)),
    ];
    lines.extend(clauses.iter().map(|c| c.to_string()));
    format!("{}\n\n", lines.join("\n"))
}

/// `[Service]` section for the selected run phase.
pub fn service_section(
    component: &str,
    phase: &str,
    env: &IndexMap<String, String>,
    privileged: bool,
    opts: &GenerateOptions,
) -> String {
    let script = opts.script_dir.join(script_file_name(component, phase));
    let mut lines = vec![
        "[Service]".to_string(),
        "Type=simple".to_string(),
        // %t is the runtime directory root (/run for the system manager)
        format!("WorkingDirectory=%t/{}", component),
    ];
    for (key, value) in env {
        lines.push(format!("Environment=\"{}={}\"", quoted(key), quoted(value)));
    }
    lines.push(format!(
        "ExecStart={} -n {} -p {}",
        exec_arg(&opts.runner_path.to_string_lossy()),
        exec_arg(component),
        exec_arg(&script.to_string_lossy())
    ));
    if privileged {
        lines.push("User=root".to_string());
        lines.push("Group=root".to_string());
    }
    format!("{}\n", lines.join("\n"))
}

/// `[Install]` section, preceded by a blank line.
pub fn install_section() -> String {
    format!("\n[Install]\nWantedBy={}\n", WANTED_BY)
}

// One line of text: line breaks fold to spaces, and a trailing backslash
// would continue the directive onto the next line.
fn description(s: &str) -> String {
    let folded = s
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    folded.trim_end_matches('\\').trim_end().replace('%', "%%")
}

// Body of a double-quoted directive value. systemd expands `%` specifiers
// inside quotes too.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '%' => out.push_str("%%"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

// One ExecStart word. `$` is doubled so systemd does not substitute
// environment variables into paths.
fn exec_arg(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '\\' | ';'));
    let text = quoted(s).replace('$', "$$");
    if needs_quotes {
        format!("\"{}\"", text)
    } else {
        text
    }
}
