use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};

/// Derive a resource name from a tag: singular, lowerCamelCase.
///
/// - `Users` → `user`
/// - `User Accounts` → `userAccount`
/// - `categories` → `category`
pub fn resource_name(tag: &str) -> String {
    let mut words: Vec<String> = tag.split_whitespace().map(str::to_string).collect();
    if let Some(last) = words.last_mut() {
        *last = singularize(last);
    }
    words.join(" ").to_lower_camel_case()
}

/// Naive singularization covering the common English plural endings.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        word.to_string()
    } else if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("sses")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
    {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

pub fn is_plural(word: &str) -> bool {
    singularize(word) != word
}

/// Lowercase words of an identifier: `getUserOrders` → `[get, user, orders]`.
pub fn words(identifier: &str) -> Vec<String> {
    identifier
        .to_snake_case()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join lowercase words back into a lowerCamelCase identifier.
pub fn join_camel(words: &[String]) -> String {
    words.join("_").to_lower_camel_case()
}

/// Join lowercase words into PascalCase.
pub fn join_pascal(words: &[String]) -> String {
    words.join("_").to_pascal_case()
}

/// Rewrite a property name to lowerCamelCase; dots, hyphens, underscores and
/// spaces are word boundaries.
pub fn camel_case(name: &str) -> String {
    let camel = name.to_lower_camel_case();
    if camel.is_empty() {
        name.to_string()
    } else {
        camel
    }
}

/// Capitalize each word, treating `-` and `_` as spaces: `pet-store api` → `Pet Store Api`.
pub fn title_case(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Collapse whitespace and escape backslashes and single quotes so the text
/// fits in a single-quoted string. Returns `None` for blank input.
pub fn escape_text(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Names of the `{placeholder}` segments of an endpoint, in order.
pub fn path_placeholders(endpoint: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = endpoint;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

fn static_segments(endpoint: &str) -> impl Iterator<Item = &str> {
    endpoint
        .split('/')
        .filter(|s| !s.is_empty() && !(s.starts_with('{') && s.ends_with('}')))
}

/// Last non-parameter segment: `/widgets/{id}` → `widgets`.
pub fn last_static_segment(endpoint: &str) -> Option<&str> {
    static_segments(endpoint).last()
}

/// First meaningful path segment, used to group untagged operations.
/// e.g. "/pets/{petId}" → "pets", "/store/inventory" → "store"
pub fn path_prefix(endpoint: &str) -> &str {
    static_segments(endpoint).next().unwrap_or("default")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("Users"), "user");
        assert_eq!(resource_name("User Accounts"), "userAccount");
        assert_eq!(resource_name("categories"), "category");
        assert_eq!(resource_name("Addresses"), "address");
        assert_eq!(resource_name("Status"), "status");
        assert_eq!(resource_name("pet-store"), "petStore");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("widgets"), "widget");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("a"), "a");
    }

    #[test]
    fn test_is_plural() {
        assert!(is_plural("orders"));
        assert!(is_plural("Widgets"));
        assert!(!is_plural("order"));
        assert!(!is_plural("status"));
    }

    #[test]
    fn test_words() {
        assert_eq!(words("getUserOrders"), vec!["get", "user", "orders"]);
        assert_eq!(words("list_all-things"), vec!["list", "all", "things"]);
        assert_eq!(join_camel(&words("getUserOrders")), "getUserOrders");
        assert_eq!(join_pascal(&["user".into(), "orders".into()]), "UserOrders");
    }

    #[test]
    fn test_camel_case_properties() {
        assert_eq!(camel_case("user.name"), "userName");
        assert_eq!(camel_case("X-Rate-Limit"), "xRateLimit");
        assert_eq!(camel_case("created_at"), "createdAt");
        assert_eq!(camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(camel_case("..."), "...");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("lichess"), "Lichess");
        assert_eq!(title_case("pet-store api"), "Pet Store Api");
        assert_eq!(title_case("GitHub v3 REST API"), "GitHub V3 REST API");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text("  Returns the\n  user's   data \n").as_deref(),
            Some("Returns the user\\'s data")
        );
        assert_eq!(escape_text(" \n\t "), None);
    }

    #[test]
    fn test_escape_text_backslashes() {
        assert_eq!(escape_text("C:\\temp\\").as_deref(), Some("C:\\\\temp\\\\"));
        assert_eq!(escape_text("it\\'s").as_deref(), Some("it\\\\\\'s"));
    }

    #[test]
    fn test_path_placeholders() {
        assert_eq!(path_placeholders("/a/{b}/c/{d}"), vec!["b", "d"]);
        assert_eq!(path_placeholders("/files/{name}.{ext}"), vec!["name", "ext"]);
        assert_eq!(path_placeholders("/a/{b}/{b}"), vec!["b"]);
        assert!(path_placeholders("/plain").is_empty());
        assert!(path_placeholders("/broken/{x").is_empty());
    }

    #[test]
    fn test_segments() {
        assert_eq!(last_static_segment("/widgets/{id}"), Some("widgets"));
        assert_eq!(last_static_segment("/users/{id}/orders"), Some("orders"));
        assert_eq!(last_static_segment("/"), None);
        assert_eq!(path_prefix("/pets/{petId}"), "pets");
        assert_eq!(path_prefix("/store/inventory"), "store");
        assert_eq!(path_prefix("/"), "default");
    }
}
