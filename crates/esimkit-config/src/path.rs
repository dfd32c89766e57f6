//! Dotted-path access over YAML value trees.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Split `esim.timeout` into `["esim", "timeout"]`.
///
/// Empty paths and empty segments (`a..b`, `.a`) are rejected.
pub fn split(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Walk `root` along `segments`. Non-mapping intermediates end the walk.
pub fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Mapping(map) => map.get(*segment),
            _ => None,
        })
}

/// Store `value` at `segments`, creating (or replacing non-mapping)
/// intermediate levels.
pub fn insert(root: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *root = value;
        return;
    };

    if !root.is_mapping() {
        *root = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = root else {
        return;
    };

    match map.get_mut(*first) {
        Some(child) => insert(child, rest, value),
        None => {
            let mut child = Value::Null;
            insert(&mut child, rest, value);
            map.insert(Value::String(first.to_string()), child);
        }
    }
}

/// Deep-merge `overlay` into `base`. Mappings merge key by key; anything else
/// in `overlay` replaces what is in `base`.
pub fn merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Dotted paths of every non-mapping value under string keys.
pub fn leaf_paths(root: &Value) -> Vec<String> {
    fn walk(node: &Value, prefix: &str, out: &mut Vec<String>) {
        match node {
            Value::Mapping(map) => {
                for (key, value) in map {
                    let Some(key) = key.as_str() else { continue };
                    let path = if prefix.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    walk(value, &path, out);
                }
            }
            _ if !prefix.is_empty() => out.push(prefix.to_string()),
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(root, "", &mut out);
    out
}
