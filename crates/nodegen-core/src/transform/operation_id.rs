use std::collections::HashSet;

use heck::ToPascalCase;

use crate::ir::Operation;

use super::context::OperationContext;
use super::naming::{is_plural, join_camel, join_pascal, last_static_segment, words};

/// Words that carry no meaning beyond the generic operation vocabulary.
const GENERIC_WORDS: &[&str] = &[
    "get", "all", "by", "id", "list", "fetch", "add", "create", "edit", "update", "delete",
    "remove",
];

/// Derive the operation id of one operation.
///
/// `siblings` holds the spec operation ids of the other operations of the same
/// resource; they decide whether a generic rewrite would merge two distinct
/// operations. Rules apply in order, first match wins:
///
/// 1. no spec id: PascalCase summary, else method + trailing path segment;
/// 2. `…ById` → `get`;
/// 3. `getXs` (plural) → `getAll`, unless a sibling is also a plural `getX`;
/// 4. `edit…` → `update`, or `edit` → `update` prefix swap on collision;
/// 5. `add…` → `create` and `fetchAll…`/`list…` → `getAll`, likewise;
/// 6. otherwise the resource's words are removed from the id.
pub fn derive_operation_id(ctx: &OperationContext<'_>, siblings: &[&str]) -> String {
    let Some(raw) = ctx.spec_operation_id() else {
        return fallback_id(ctx);
    };

    if raw.ends_with("ById") {
        return "get".to_string();
    }

    if is_plural_get(raw) {
        if siblings.iter().any(|s| is_plural_get(s)) {
            return raw.to_string();
        }
        return "getAll".to_string();
    }

    let rewrites: [(&[&str], &str); 3] = [
        (&["edit"], "update"),
        (&["add"], "create"),
        (&["fetchAll", "list"], "getAll"),
    ];
    for (prefixes, generic) in rewrites {
        if let Some(id) = rewrite_prefix(raw, prefixes, generic, siblings) {
            return id;
        }
    }

    strip_resource(raw, ctx.resource)
}

/// Synthesized id for operations the spec leaves unnamed.
fn fallback_id(ctx: &OperationContext<'_>) -> String {
    if let Some(summary) = ctx.operation.summary.as_deref() {
        let pascal = summary.to_pascal_case();
        if !pascal.is_empty() {
            return pascal;
        }
    }
    let segment = last_static_segment(ctx.endpoint)
        .map(|s| s.to_pascal_case())
        .unwrap_or_default();
    format!("{}{}", ctx.method.as_lower(), segment)
}

/// `get` followed by a capitalized word, ending in a plural word.
fn is_plural_get(id: &str) -> bool {
    if !has_prefix(id, "get") || id.len() == 3 {
        return false;
    }
    words(id).last().is_some_and(|last| is_plural(last))
}

/// `prefix` at the start of `id`, ending at a word boundary (`addWidget`, not `address`).
fn has_prefix(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(rest) => rest
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_lowercase()),
        None => false,
    }
}

fn rewrite_prefix(raw: &str, prefixes: &[&str], generic: &str, siblings: &[&str]) -> Option<String> {
    let prefix = prefixes.iter().find(|p| has_prefix(raw, p))?;
    let collides = siblings
        .iter()
        .any(|s| prefixes.iter().any(|p| has_prefix(s, p)));
    if collides {
        Some(format!("{generic}{}", &raw[prefix.len()..]))
    } else {
        Some(generic.to_string())
    }
}

/// Remove the resource's words from the id: `getUserOrders` on `user` → `getOrders`.
fn strip_resource(raw: &str, resource: &str) -> String {
    let id_words = words(raw);
    let resource_words = words(resource);
    if resource_words.is_empty() || id_words.len() <= resource_words.len() {
        return raw.to_string();
    }

    let mut kept = Vec::with_capacity(id_words.len());
    let mut i = 0;
    let mut stripped = false;
    while i < id_words.len() {
        if id_words[i..].starts_with(&resource_words) {
            i += resource_words.len();
            stripped = true;
        } else {
            kept.push(id_words[i].clone());
            i += 1;
        }
    }

    if !stripped || kept.is_empty() {
        return raw.to_string();
    }
    join_camel(&kept)
}

/// The meaningful, non-generic part of a spec operation id as PascalCase:
/// `addWidgetComment` on `widget` → `Comment`.
pub fn surplus(raw: Option<&str>, resource: &str) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let resource_words = words(resource);
    let kept: Vec<String> = words(raw)
        .into_iter()
        .filter(|w| !GENERIC_WORDS.contains(&w.as_str()) && !resource_words.contains(w))
        .collect();
    join_pascal(&kept)
}

/// Make operation ids unique within one resource.
///
/// Operations are visited in document order. The first holder of an id keeps
/// it; each later one gets the surplus of its spec id appended, and a numeric
/// suffix (from 2) when that is empty or still taken.
pub fn disambiguate(operations: &mut [Operation], spec_ids: &[Option<&str>], resource: &str) {
    let mut taken: HashSet<String> = HashSet::with_capacity(operations.len());

    for (operation, spec_id) in operations.iter_mut().zip(spec_ids) {
        if taken.insert(operation.operation_id.clone()) {
            continue;
        }

        let base = format!("{}{}", operation.operation_id, surplus(*spec_id, resource));
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }

        log::warn!(
            "{resource}: operation id {} of {} {} already taken, renamed to {candidate}",
            operation.operation_id,
            operation.request_method,
            operation.endpoint
        );
        taken.insert(candidate.clone());
        operation.operation_id = candidate;
    }
}
