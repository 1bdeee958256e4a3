use std::fmt;

/// A fully resolved, generator-ready intermediate representation of an
/// OpenAPI spec.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    pub servers: Vec<IrServer>,
    pub schemas: Vec<IrSchema>,
    pub operations: Vec<IrOperation>,
    pub modules: Vec<IrModule>,
    pub security_schemes: Vec<IrSecurityScheme>,
}

/// API metadata.
#[derive(Debug, Clone)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A server URL.
#[derive(Debug, Clone)]
pub struct IrServer {
    pub url: String,
    pub description: Option<String>,
}

/// A module groups operations by tag. The index order is the registration
/// order used by path-based routers; `route_order` rearranges it in place.
#[derive(Debug, Clone)]
pub struct IrModule {
    pub name: NormalizedName,
    pub operations: Vec<usize>, // indices into IrSpec.operations
}

/// An authentication scheme the generated server wires middleware for.
#[derive(Debug, Clone)]
pub struct IrSecurityScheme {
    pub name: NormalizedName,
    pub kind: IrAuthKind,
    pub description: Option<String>,
}

/// Supported authentication middleware kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrAuthKind {
    HttpBearer { format: Option<String> },
    HttpBasic,
    ApiKey { param: String, location: IrApiKeyLocation },
}

/// Where an API key is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrApiKeyLocation {
    Query,
    Header,
    Cookie,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub kebab_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

// Re-export schema and operation types for convenience
pub use super::operations::*;
pub use super::schemas::*;
