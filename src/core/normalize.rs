//! RU-002: Key normalization.
//!
//! Recipe keys are case-insensitive (`ComponentName`, `componentName` and
//! `componentname` are the same key). Rather than fold case on every lookup,
//! the whole parsed tree is rewritten once with lowercase mapping keys.

use serde_yaml_ng::{Mapping, Value};

/// Recursively lowercase every string mapping key.
///
/// Sequences keep their order, scalars pass through untouched. When two keys
/// collide after lowercasing, the later value wins and keeps the earlier
/// position.
pub fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => Value::String(s.to_lowercase()),
                    other => other,
                };
                out.insert(key, lowercase_keys(v));
            }
            Value::Mapping(out)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lowercase_keys).collect()),
        Value::Tagged(mut tagged) => {
            tagged.value = lowercase_keys(std::mem::take(&mut tagged.value));
            Value::Tagged(tagged)
        }
        scalar => scalar,
    }
}
