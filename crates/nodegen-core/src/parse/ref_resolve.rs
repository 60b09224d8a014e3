use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Resolves all local `$ref` pointers of a document, producing a tree with
/// no remaining references except those closing a cycle.
pub struct RefResolver<'a> {
    root: &'a Value,
    visiting: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            visiting: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, node: &Value) -> Result<Value, ResolveError> {
        match node {
            Value::Object(map) => match map.get("$ref") {
                Some(Value::String(ref_path)) => self.resolve_ref(ref_path, map),
                _ => {
                    let mut resolved = Map::with_capacity(map.len());
                    for (key, value) in map {
                        resolved.insert(key.clone(), self.resolve(value)?);
                    }
                    Ok(Value::Object(resolved))
                }
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Ok(node.clone()),
        }
    }

    fn resolve_ref(
        &mut self,
        ref_path: &str,
        node: &Map<String, Value>,
    ) -> Result<Value, ResolveError> {
        if self.visiting.contains(ref_path) {
            // Circular reference: keep the pointer instead of expanding forever.
            log::debug!("leaving circular reference {ref_path} in place");
            return Ok(Value::Object(node.clone()));
        }

        let target = lookup(self.root, ref_path)?;
        self.visiting.insert(ref_path.to_string());
        let resolved = self.resolve(target);
        self.visiting.remove(ref_path);
        let mut resolved = resolved?;

        // Siblings of `$ref` (e.g. a local `description`) override the target.
        if let Value::Object(ref mut obj) = resolved {
            for (key, value) in node {
                if key != "$ref" {
                    obj.insert(key.clone(), self.resolve(value)?);
                }
            }
        }
        Ok(resolved)
    }
}

/// Follow a `#/json/pointer` reference inside the document.
fn lookup<'v>(root: &'v Value, ref_path: &str) -> Result<&'v Value, ResolveError> {
    let pointer = ref_path
        .strip_prefix('#')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(ResolveError::InvalidRefFormat(ref_path.to_string()));
    }
    root.pointer(pointer)
        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
}
