use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing
/// variants. The kebab variant names generated files and directories.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        kebab_case: sanitized.to_kebab_case(),
    }
}

/// Derive a camelCase operation name from HTTP method + path, used when a
/// spec omits `operationId` or the route-based naming strategy is selected.
///
/// Examples:
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `POST /users` → `createUsers`
/// - `DELETE /users/{userId}` → `deleteUser`
pub fn route_to_name(method: &str, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut resource_parts: Vec<String> = Vec::new();
    let mut ends_with_param = false;

    for seg in &segments {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg.to_string());
            ends_with_param = false;
        }
    }

    let method_upper = method.to_uppercase();
    let prefix = match method_upper.as_str() {
        "GET" if ends_with_param => "get",
        "GET" => "list",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        "PATCH" => "patch",
        "OPTIONS" => "options",
        "HEAD" => "head",
        "TRACE" => "trace",
        other => other,
    };

    if resource_parts.is_empty() {
        return prefix.to_string();
    }

    // Single-resource ops (trailing param) singularize the last segment.
    let mut pascal_parts = String::new();
    for (i, part) in resource_parts.iter().enumerate() {
        let is_last = i == resource_parts.len() - 1;
        let word = if is_last && ends_with_param {
            singularize(part)
        } else {
            part.to_string()
        };
        pascal_parts.push_str(&word.to_pascal_case());
    }

    format!("{prefix}{pascal_parts}")
}

/// Naive singularization: strips trailing 's' if present.
fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
