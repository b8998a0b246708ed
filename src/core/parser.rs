//! RU-003: Recipe loading.
//!
//! Reads recipe YAML, lowercases every key, then deserializes into the typed
//! [`Recipe`]. Missing required keys surface as parse errors naming the key.
//! Component and dependency names end up in file names and unit directives,
//! so they are restricted to letters, digits, `.`, `-` and `_`.

use super::normalize::lowercase_keys;
use super::types::Recipe;
use crate::error::{Error, Result};
use std::path::Path;

/// Parse a recipe file from disk.
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_recipe(&content).map_err(|e| match e {
        Error::Parse(msg) => Error::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Parse a recipe from a string.
pub fn parse_recipe(yaml: &str) -> Result<Recipe> {
    let raw: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::Parse(format!("YAML parse error: {}", e)))?;
    let normalized = lowercase_keys(raw);
    if !normalized.is_mapping() {
        return Err(Error::Parse("recipe root must be a mapping".to_string()));
    }
    let recipe: Recipe = serde_yaml_ng::from_value(normalized)
        .map_err(|e| Error::Parse(format!("invalid recipe: {}", e)))?;
    check_name("componentname", &recipe.componentname)?;
    for (name, _) in recipe.dependencies() {
        check_name("dependency", name)?;
    }
    Ok(recipe)
}

fn check_name(what: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "{} {:?} may only contain letters, digits, '.', '-' and '_'",
            what, name
        )))
    }
}
