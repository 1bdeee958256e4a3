use minijinja::{Environment, context};

use apigen_core::ir::{IrOperation, NormalizedName};

use crate::EmitError;
use crate::uploads::{file_upload_properties, operation_supports_multipart};

use super::path_template;

/// Emit a group's router module. Operations must already be in
/// registration order — the template registers them top to bottom.
pub fn emit_routes(
    group: &NormalizedName,
    operations: &[&IrOperation],
    contains_multipart: bool,
) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template("routes.ts.j2", include_str!("../../templates/routes.ts.j2"))
        .expect("template should be valid");
    let tmpl = env
        .get_template("routes.ts.j2")
        .expect("template was just added");

    let has_auth = operations.iter().any(|op| !op.security.is_empty());
    let op_contexts: Vec<minijinja::Value> = operations
        .iter()
        .map(|op| build_operation_context(op))
        .collect();

    Ok(tmpl.render(context! {
        group_kebab => group.kebab_case.clone(),
        contains_multipart => contains_multipart,
        has_auth => has_auth,
        operations => op_contexts,
    })?)
}

fn build_operation_context(op: &IrOperation) -> minijinja::Value {
    let upload_fields: Vec<minijinja::Value> = if operation_supports_multipart(op) {
        op.request_body
            .as_ref()
            .map(|body| file_upload_properties(&body.properties))
            .unwrap_or_default()
            .iter()
            .map(|f| context! { name => f.name.clone(), max_count => f.max_count })
            .collect()
    } else {
        Vec::new()
    };

    let auth_schemes: Vec<String> = op.security.iter().map(|s| s.scheme.clone()).collect();

    context! {
        name => op.name.camel_case.clone(),
        method => op.method.as_str().to_ascii_lowercase(),
        path => path_template(&op.path),
        summary => op.summary.clone(),
        deprecated => op.deprecated,
        auth_schemes => auth_schemes,
        upload_fields => upload_fields,
        has_response => op.response.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::{
        HttpMethod, IrBodyProperty, IrRequestBody, IrResponse, IrSecurityRequirement, IrType,
        PropertyShape, SchemaPurpose,
    };
    use apigen_core::transform::name_normalizer::normalize_name;

    fn op(method: HttpMethod, path: &str, name: &str) -> IrOperation {
        IrOperation {
            name: normalize_name(name),
            method,
            path: path.to_string(),
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: None,
            response: Some(IrResponse {
                response_type: IrType::Any,
                description: None,
            }),
            security: vec![],
            deprecated: false,
        }
    }

    #[test]
    fn routes_register_in_slice_order() {
        let list = op(HttpMethod::Get, "/pets", "listPets");
        let get = op(HttpMethod::Get, "/pets/{petId}", "getPet");
        let ops = vec![&list, &get];
        let out = emit_routes(&normalize_name("pets"), &ops, false).unwrap();

        let list_at = out.find("impl.listPets").unwrap();
        let get_at = out.find("impl.getPet").unwrap();
        assert!(list_at < get_at, "listPets must be registered first");
        assert!(out.contains("router.get(\n  \"/pets/:petId\","));
        assert!(!out.contains("multer"));
    }

    #[test]
    fn multipart_operation_gets_upload_fields() {
        let mut upload = op(HttpMethod::Post, "/media", "uploadMedia");
        upload.request_body = Some(IrRequestBody {
            body_type: IrType::Any,
            required: true,
            content_type: "multipart/form-data".to_string(),
            description: None,
            properties: vec![
                IrBodyProperty::new(
                    "file".to_string(),
                    SchemaPurpose::Metadata,
                    PropertyShape::Object,
                    true,
                    None,
                    Some(IrType::File),
                ),
                IrBodyProperty::new(
                    "gallery".to_string(),
                    SchemaPurpose::Metadata,
                    PropertyShape::Array {
                        min_items: Some(1),
                        max_items: None,
                    },
                    false,
                    None,
                    Some(IrType::File),
                ),
            ],
        });
        let ops = vec![&upload];
        let out = emit_routes(&normalize_name("media"), &ops, true).unwrap();

        assert!(out.contains("import multer from \"multer\";"));
        assert!(out.contains("{ name: \"file\", maxCount: 1 }"));
        // Unbounded arrays omit maxCount so multer accepts any number.
        assert!(out.contains("{ name: \"gallery\" }"));
    }

    #[test]
    fn secured_operation_wires_auth_middleware() {
        let mut me = op(HttpMethod::Get, "/users/me", "getCurrentUser");
        me.security = vec![IrSecurityRequirement {
            scheme: "bearerAuth".to_string(),
            scopes: vec![],
        }];
        let ops = vec![&me];
        let out = emit_routes(&normalize_name("users"), &ops, false).unwrap();

        assert!(out.contains("import { requireAuth } from \"../../auth\";"));
        assert!(out.contains("requireAuth([\"bearerAuth\"]),"));
    }
}
