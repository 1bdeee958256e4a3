use std::collections::HashMap;

use indexmap::IndexMap;
use log::warn;

use crate::config::NamingStrategy;
use crate::error::TransformError;
use crate::ir::*;
use crate::parse::content::{MediaType, RequestBodyOrRef, ResponseOrRef};
use crate::parse::operation::{Operation, ParameterLocation, ParameterOrRef, PathItem};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::security::{SecurityScheme, SecuritySchemeType};
use crate::parse::spec::OpenApiSpec;

use super::body_properties::classify_body_properties;
use super::name_normalizer::{normalize_name, route_to_name};
use super::schema_resolver::{schema_or_ref_to_ir_schema, schema_or_ref_to_ir_type};

/// Options controlling how the transform phase resolves operation names.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub naming_strategy: NamingStrategy,
    pub aliases: IndexMap<String, String>,
}

/// Transform a parsed OpenAPI spec into the fully resolved IR.
pub fn transform(spec: &OpenApiSpec) -> Result<IrSpec, TransformError> {
    transform_with_options(spec, &TransformOptions::default())
}

/// Transform with explicit naming options.
pub fn transform_with_options(
    spec: &OpenApiSpec,
    options: &TransformOptions,
) -> Result<IrSpec, TransformError> {
    let resolver = RefResolver::new(spec);

    // Phase 1: inline non-schema refs in path items
    let paths = resolver.resolve_paths(spec)?;

    // Phase 2: component schemas
    let schemas = resolve_schemas(spec)?;

    // Phase 3: operations
    let operations = resolve_operations(&paths, &resolver, options)?;

    // Phase 4: group operations into modules by tag
    let modules = group_into_modules(&operations);

    // Phase 5: security schemes
    let security_schemes = resolve_security_schemes(spec);

    let info = IrInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
    };

    let servers = spec
        .servers
        .iter()
        .map(|s| IrServer {
            url: s.url.clone(),
            description: s.description.clone(),
        })
        .collect();

    Ok(IrSpec {
        info,
        servers,
        schemas,
        operations,
        modules,
        security_schemes,
    })
}

fn resolve_schemas(spec: &OpenApiSpec) -> Result<Vec<IrSchema>, TransformError> {
    let mut schemas = Vec::new();
    if let Some(ref components) = spec.components {
        for (name, schema_or_ref) in &components.schemas {
            schemas.push(schema_or_ref_to_ir_schema(name, schema_or_ref)?);
        }
    }
    Ok(schemas)
}

fn resolve_operations(
    paths: &IndexMap<String, PathItem>,
    resolver: &RefResolver<'_>,
    options: &TransformOptions,
) -> Result<Vec<IrOperation>, TransformError> {
    let mut operations = Vec::new();

    for (path, item) in paths {
        let path_params = resolve_parameters(&item.parameters);

        macro_rules! add_op {
            ($method:expr, $op:expr) => {
                if let Some(ref op) = $op {
                    operations.push(build_operation(
                        $method,
                        path,
                        op,
                        &path_params,
                        resolver,
                        options,
                    ));
                }
            };
        }

        add_op!(HttpMethod::Get, item.get);
        add_op!(HttpMethod::Post, item.post);
        add_op!(HttpMethod::Put, item.put);
        add_op!(HttpMethod::Delete, item.delete);
        add_op!(HttpMethod::Patch, item.patch);
        add_op!(HttpMethod::Options, item.options);
        add_op!(HttpMethod::Head, item.head);
        add_op!(HttpMethod::Trace, item.trace);
    }

    Ok(operations)
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    op: &Operation,
    path_params: &[IrParameter],
    resolver: &RefResolver<'_>,
    options: &TransformOptions,
) -> IrOperation {
    let raw_name = match options.naming_strategy {
        NamingStrategy::UseOperationId => op
            .operation_id
            .clone()
            .unwrap_or_else(|| route_to_name(method.as_str(), path)),
        NamingStrategy::UseRouteBased => route_to_name(method.as_str(), path),
    };

    let name = options
        .aliases
        .get(&raw_name)
        .cloned()
        .unwrap_or(raw_name);

    let mut parameters = path_params.to_vec();
    parameters.extend(resolve_parameters(&op.parameters));

    let request_body = op
        .request_body
        .as_ref()
        .and_then(|body| resolve_request_body(body, resolver));

    let response = resolve_response(&op.responses);

    let security = op
        .security
        .as_ref()
        .map(|reqs| {
            reqs.iter()
                .flat_map(|req| {
                    req.iter().map(|(scheme, scopes)| IrSecurityRequirement {
                        scheme: scheme.clone(),
                        scopes: scopes.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    IrOperation {
        name: normalize_name(&name),
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        request_body,
        response,
        security,
        deprecated: op.deprecated.unwrap_or(false),
    }
}

fn resolve_parameters(params: &[ParameterOrRef]) -> Vec<IrParameter> {
    params
        .iter()
        .filter_map(|p| match p {
            ParameterOrRef::Parameter(param) => {
                let location = match param.location {
                    ParameterLocation::Path => IrParameterLocation::Path,
                    ParameterLocation::Query => IrParameterLocation::Query,
                    ParameterLocation::Header => IrParameterLocation::Header,
                    ParameterLocation::Cookie => IrParameterLocation::Cookie,
                };
                Some(IrParameter {
                    name: normalize_name(&param.name),
                    original_name: param.name.clone(),
                    location,
                    param_type: param
                        .schema
                        .as_ref()
                        .map(schema_or_ref_to_ir_type)
                        .unwrap_or(IrType::Any),
                    required: param.required,
                    description: param.description.clone(),
                })
            }
            // Refs are inlined in phase 1; anything left is unresolvable.
            ParameterOrRef::Ref { ref_path } => {
                warn!("dropping unresolved parameter ref: {ref_path}");
                None
            }
        })
        .collect()
}

/// Pick the default content of a request body — `application/json` when
/// declared, the first media type otherwise — and classify its properties.
fn resolve_request_body(
    body: &RequestBodyOrRef,
    resolver: &RefResolver<'_>,
) -> Option<IrRequestBody> {
    let rb = match body {
        RequestBodyOrRef::RequestBody(rb) => rb,
        RequestBodyOrRef::Ref { ref_path } => {
            warn!("dropping unresolved request body ref: {ref_path}");
            return None;
        }
    };

    let (content_type, media): (&String, &MediaType) = rb
        .content
        .get_key_value("application/json")
        .or_else(|| rb.content.first())?;

    let body_type = media
        .schema
        .as_ref()
        .map(schema_or_ref_to_ir_type)
        .unwrap_or(IrType::Any);

    let properties = classify_body_properties(resolver, content_type, media);

    Some(IrRequestBody {
        body_type,
        required: rb.required,
        content_type: content_type.clone(),
        description: rb.description.clone(),
        properties,
    })
}

fn resolve_response(responses: &IndexMap<String, ResponseOrRef>) -> Option<IrResponse> {
    let success = responses
        .get("200")
        .or_else(|| responses.get("201"))
        .or_else(|| responses.get("2XX"))
        .or_else(|| responses.get("default"))?;

    let response = match success {
        ResponseOrRef::Response(r) => r,
        ResponseOrRef::Ref { ref_path } => {
            warn!("dropping unresolved response ref: {ref_path}");
            return None;
        }
    };

    let (_content_type, media) = response
        .content
        .get_key_value("application/json")
        .or_else(|| response.content.first())?;

    Some(IrResponse {
        response_type: media
            .schema
            .as_ref()
            .map(schema_or_ref_to_ir_type)
            .unwrap_or(IrType::Any),
        description: Some(response.description.clone()),
    })
}

fn resolve_security_schemes(spec: &OpenApiSpec) -> Vec<IrSecurityScheme> {
    let Some(ref components) = spec.components else {
        return Vec::new();
    };

    components
        .security_schemes
        .iter()
        .filter_map(|(name, scheme)| {
            let kind = security_scheme_kind(name, scheme)?;
            Some(IrSecurityScheme {
                name: normalize_name(name),
                kind,
                description: scheme.description.clone(),
            })
        })
        .collect()
}

fn security_scheme_kind(name: &str, scheme: &SecurityScheme) -> Option<IrAuthKind> {
    match scheme.scheme_type {
        SecuritySchemeType::Http => match scheme.scheme.as_deref() {
            Some("bearer") => Some(IrAuthKind::HttpBearer {
                format: scheme.bearer_format.clone(),
            }),
            Some("basic") => Some(IrAuthKind::HttpBasic),
            other => {
                warn!("unsupported http auth scheme {other:?} on '{name}', skipping");
                None
            }
        },
        SecuritySchemeType::ApiKey => {
            let param = scheme.name.clone()?;
            let location = match scheme.location? {
                crate::parse::security::ApiKeyLocation::Query => IrApiKeyLocation::Query,
                crate::parse::security::ApiKeyLocation::Header => IrApiKeyLocation::Header,
                crate::parse::security::ApiKeyLocation::Cookie => IrApiKeyLocation::Cookie,
            };
            Some(IrAuthKind::ApiKey { param, location })
        }
        SecuritySchemeType::OAuth2 | SecuritySchemeType::OpenIdConnect => {
            // Token-based flows are validated the same way as bearer auth by
            // the generated middleware.
            Some(IrAuthKind::HttpBearer { format: None })
        }
    }
}

fn group_into_modules(operations: &[IrOperation]) -> Vec<IrModule> {
    let mut tag_groups: HashMap<String, Vec<usize>> = HashMap::new();

    for (i, op) in operations.iter().enumerate() {
        if op.tags.is_empty() {
            tag_groups.entry("default".to_string()).or_default().push(i);
        } else {
            for tag in &op.tags {
                tag_groups.entry(tag.clone()).or_default().push(i);
            }
        }
    }

    let mut modules: Vec<IrModule> = tag_groups
        .into_iter()
        .map(|(name, ops)| IrModule {
            name: normalize_name(&name),
            operations: ops,
        })
        .collect();

    modules.sort_by(|a, b| a.name.original.cmp(&b.name.original));
    modules
}
