//! RU-004: Dependency ordering clauses.
//!
//! Every declared dependency yields exactly one clause, in declaration order:
//! hard dependencies become `After=`, everything else `Wants=`.

use super::types::{DependencyKind, OrderingClause, Recipe};

/// Build one ordering clause per dependency of the recipe.
pub fn ordering_clauses(recipe: &Recipe) -> Vec<OrderingClause> {
    recipe
        .dependencies()
        .map(|(name, meta)| {
            let target = format!("{}.service", name);
            if let Some(range) = meta.and_then(|m| m.versionrequirement.as_deref()) {
                tracing::warn!(
                    dependency = name,
                    version = range,
                    "version requirements are not translated into the unit"
                );
            }
            match meta.map(|m| m.kind()).unwrap_or(DependencyKind::Soft) {
                DependencyKind::Hard => OrderingClause::After(target),
                DependencyKind::Soft => OrderingClause::Wants(target),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_recipe;
    use crate::core::types::DependencyMeta;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn recipe_with(deps: Option<IndexMap<String, Option<DependencyMeta>>>) -> Recipe {
        Recipe {
            componentname: "demo".to_string(),
            componentdescription: "Demo".to_string(),
            componentversion: None,
            componentdependencies: deps,
            manifests: vec![],
            lifecycle: None,
        }
    }

    #[test]
    fn test_ru004_hard_and_soft() {
        let recipe = parse_recipe(
            r#"
ComponentName: demo
ComponentDescription: Demo
ComponentDependencies:
  alpha:
    DependencyType: HARD
  beta:
    DependencyType: SOFT
  gamma: {}
  delta: ~
Manifests: []
"#,
        )
        .unwrap();
        let clauses = ordering_clauses(&recipe);
        assert_eq!(
            clauses,
            vec![
                OrderingClause::After("alpha.service".to_string()),
                OrderingClause::Wants("beta.service".to_string()),
                OrderingClause::Wants("gamma.service".to_string()),
                OrderingClause::Wants("delta.service".to_string()),
            ]
        );
    }

    #[test]
    fn test_ru004_case_insensitive_type() {
        let recipe = parse_recipe(
            r#"
componentname: demo
componentdescription: Demo
componentdependencies:
  a: { dependencytype: hard }
  b: { dependencytype: Hard }
manifests: []
"#,
        )
        .unwrap();
        let clauses = ordering_clauses(&recipe);
        assert!(clauses.iter().all(|c| matches!(c, OrderingClause::After(_))));
    }

    #[test]
    fn test_ru004_absent_and_empty() {
        assert!(ordering_clauses(&recipe_with(None)).is_empty());
        assert!(ordering_clauses(&recipe_with(Some(IndexMap::new()))).is_empty());
    }

    #[test]
    fn test_ru004_version_requirement_still_orders() {
        let mut deps = IndexMap::new();
        deps.insert(
            "nucleus".to_string(),
            Some(DependencyMeta {
                dependencytype: Some("HARD".to_string()),
                versionrequirement: Some(">=2.0.0 <3.0.0".to_string()),
            }),
        );
        let clauses = ordering_clauses(&recipe_with(Some(deps)));
        assert_eq!(clauses, vec![OrderingClause::After("nucleus.service".to_string())]);
    }

    proptest! {
        #[test]
        fn prop_ru004_one_clause_per_dependency(
            entries in prop::collection::vec(
                ("[a-z]{1,8}", prop::option::of(prop_oneof![
                    Just("hard"), Just("HARD"), Just("Hard"), Just("soft"), Just("SOFT"), Just("weird"),
                ])),
                0..12,
            )
        ) {
            let mut deps = IndexMap::new();
            for (name, kind) in entries {
                deps.insert(name, Some(DependencyMeta {
                    dependencytype: kind.map(str::to_string),
                    versionrequirement: None,
                }));
            }
            let recipe = recipe_with(Some(deps.clone()));
            let clauses = ordering_clauses(&recipe);
            prop_assert_eq!(clauses.len(), deps.len());
            for (clause, (name, meta)) in clauses.iter().zip(deps.iter()) {
                prop_assert_eq!(clause.target(), format!("{}.service", name));
                let hard = meta
                    .as_ref()
                    .and_then(|m| m.dependencytype.as_deref())
                    .is_some_and(|t| t.eq_ignore_ascii_case("hard"));
                prop_assert_eq!(matches!(clause, OrderingClause::After(_)), hard);
            }
        }
    }
}
