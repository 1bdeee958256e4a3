pub mod app;
pub mod auth;
pub mod models;
pub mod multipart;
pub mod routes;
pub mod scaffold;
pub mod stubs;

/// Build a file path under the configured source directory.
///
/// - `source_dir = "src"` → `"src/index.ts"`
/// - `source_dir = ""` → `"index.ts"`
pub fn source_path(source_dir: &str, file: &str) -> String {
    if source_dir.is_empty() {
        file.to_string()
    } else {
        format!("{source_dir}/{file}")
    }
}

/// Convert an OpenAPI path template to an Express route pattern:
/// `/pets/{petId}` → `/pets/:petId`.
pub fn path_template(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                result.push(':');
                result.push_str(&rest[open + 1..open + close]);
                rest = &rest[open + close + 1..];
            }
            None => {
                // Unterminated brace, keep the remainder as-is.
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// True for JSON-carrying MIME types: `application/json`,
/// `application/problem+json`, but not `text/jsonish`.
pub fn is_json_mime(mime: &str) -> bool {
    match mime.strip_suffix("json") {
        Some("") => true,
        Some(prefix) => prefix
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_ascii_alphanumeric()),
        None => false,
    }
}
