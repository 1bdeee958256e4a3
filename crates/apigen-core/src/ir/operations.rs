use super::schemas::{IrBodyProperty, IrType};
use super::types::NormalizedName;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// A fully resolved API operation.
#[derive(Debug, Clone)]
pub struct IrOperation {
    pub name: NormalizedName,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub request_body: Option<IrRequestBody>,
    pub response: Option<IrResponse>,
    pub security: Vec<IrSecurityRequirement>,
    pub deprecated: bool,
}

/// A resolved success response. `None` on the operation means no body (204).
#[derive(Debug, Clone)]
pub struct IrResponse {
    pub response_type: IrType,
    pub description: Option<String>,
}

/// A resolved path/query/header parameter.
#[derive(Debug, Clone)]
pub struct IrParameter {
    pub name: NormalizedName,
    pub original_name: String,
    pub location: IrParameterLocation,
    pub param_type: IrType,
    pub required: bool,
    pub description: Option<String>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// A resolved request body.
///
/// `content_type` is the MIME type of the body's default content: the
/// generator prefers `application/json` and otherwise takes the first
/// declared media type. `properties` is populated for form-style bodies
/// (multipart and urlencoded) and drives upload-middleware wiring.
#[derive(Debug, Clone)]
pub struct IrRequestBody {
    pub body_type: IrType,
    pub required: bool,
    pub content_type: String,
    pub description: Option<String>,
    pub properties: Vec<IrBodyProperty>,
}

/// A security requirement on an operation: scheme name plus scopes.
#[derive(Debug, Clone)]
pub struct IrSecurityRequirement {
    pub scheme: String,
    pub scopes: Vec<String>,
}
