//! RU-005: Platform and lifecycle selection.
//!
//! A manifest applies to this host when its OS is `linux`, `*`, or empty.
//! Its lifecycle is either embedded or reached through the first named
//! selection in the recipe's top-level lifecycle mapping.

use super::types::{Lifecycle, Manifest, Recipe};
use crate::error::{Error, Result};

/// OS identifiers that apply to a Linux host.
const LINUX_OS: [&str; 3] = ["linux", "*", ""];

/// Run-phase precedence: first non-empty wins.
const RUN_PHASES: [&str; 2] = ["startup", "run"];

/// Does this manifest apply to a Linux host?
pub fn applies_to_linux(manifest: &Manifest) -> bool {
    LINUX_OS.contains(&manifest.os())
}

/// Manifests applicable to this host, in recipe order.
pub fn linux_manifests(recipe: &Recipe) -> impl Iterator<Item = &Manifest> {
    recipe.manifests.iter().filter(|m| applies_to_linux(m))
}

/// Resolve the lifecycle a manifest points at.
///
/// Returns `Ok(None)` when a selection names nothing in the top-level
/// lifecycle mapping; that reads as an empty lifecycle, not an error.
pub fn resolve_lifecycle<'a>(recipe: &'a Recipe, manifest: &'a Manifest) -> Result<Option<&'a Lifecycle>> {
    if let Some(lifecycle) = manifest.lifecycle.as_ref().filter(|l| !l.is_empty()) {
        return Ok(Some(lifecycle));
    }

    let selection = manifest
        .selections
        .as_ref()
        .and_then(|s| s.first())
        .ok_or_else(|| Error::Configuration("Selection or Lifecycle must be mentioned.".to_string()))?;

    let resolved = recipe.selection(selection);
    if resolved.is_none() {
        tracing::debug!(selection = %selection, "selection not found in top-level lifecycle");
    }
    Ok(resolved)
}

/// Pick the phase that becomes `ExecStart`: `startup`, else `run`.
///
/// `None` means there is nothing to run and unit generation is skipped.
pub fn select_run_phase(lifecycle: Option<&Lifecycle>) -> Option<&'static str> {
    let lifecycle = lifecycle?;
    RUN_PHASES
        .into_iter()
        .find(|phase| lifecycle.phase(phase).is_some_and(|p| !p.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_recipe;

    fn recipe(yaml: &str) -> Recipe {
        parse_recipe(yaml).unwrap()
    }

    #[test]
    fn test_ru005_os_matching() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - platform: { os: linux }
  - platform: { os: "*" }
  - platform: { os: "" }
  - platform: {}
  - {}
  - platform: { os: windows }
  - platform: { os: darwin }
  - platform: { os: Linux }
"#,
        );
        let applies: Vec<bool> = r.manifests.iter().map(applies_to_linux).collect();
        assert_eq!(applies, vec![true, true, true, true, true, false, false, false]);
        assert_eq!(linux_manifests(&r).count(), 5);
    }

    #[test]
    fn test_ru005_embedded_lifecycle() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - platform: { os: linux }
    lifecycle:
      run: echo embedded
    selections: [other]
lifecycle:
  other:
    run: echo selected
"#,
        );
        let lc = resolve_lifecycle(&r, &r.manifests[0]).unwrap().unwrap();
        assert!(lc.phase("run").is_some());
        assert!(matches!(
            lc.phase("run"),
            Some(crate::core::types::PhaseDef::Command(c)) if c == "echo embedded"
        ));
    }

    #[test]
    fn test_ru005_selection_first_entry() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - platform: { os: linux }
    selections: [first, second]
lifecycle:
  first:
    run: echo first
  second:
    run: echo second
"#,
        );
        let lc = resolve_lifecycle(&r, &r.manifests[0]).unwrap().unwrap();
        assert!(matches!(
            lc.phase("run"),
            Some(crate::core::types::PhaseDef::Command(c)) if c == "echo first"
        ));
    }

    #[test]
    fn test_ru005_empty_embedded_falls_back_to_selection() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - lifecycle: {}
    selections: [all]
lifecycle:
  all:
    startup: ./start
"#,
        );
        let lc = resolve_lifecycle(&r, &r.manifests[0]).unwrap();
        assert_eq!(select_run_phase(lc), Some("startup"));
    }

    #[test]
    fn test_ru005_missing_selection_is_empty() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - platform: { os: linux }
    selections: [ghost]
lifecycle:
  real:
    run: echo hi
"#,
        );
        let lc = resolve_lifecycle(&r, &r.manifests[0]).unwrap();
        assert!(lc.is_none());
        assert_eq!(select_run_phase(lc), None);
    }

    #[test]
    fn test_ru005_neither_lifecycle_nor_selection() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests:
  - platform: { os: linux }
    selections: []
"#,
        );
        let err = resolve_lifecycle(&r, &r.manifests[0]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("Selection or Lifecycle must be mentioned."));
    }

    #[test]
    fn test_ru005_run_phase_precedence() {
        let r = recipe(
            r#"
componentname: demo
componentdescription: Demo
manifests: []
lifecycle:
  both: { startup: ./s, run: ./r }
  run_only: { run: ./r }
  empty_startup: { startup: "", run: ./r }
  null_startup: { startup: ~, run: ./r }
  install_only: { install: ./i }
  structured: { startup: { script: ./s } }
"#,
        );
        let phase = |name: &str| select_run_phase(r.selection(name));
        assert_eq!(phase("both"), Some("startup"));
        assert_eq!(phase("run_only"), Some("run"));
        assert_eq!(phase("empty_startup"), Some("run"));
        assert_eq!(phase("null_startup"), Some("run"));
        assert_eq!(phase("install_only"), None);
        assert_eq!(phase("structured"), Some("startup"));
    }
}
