use minijinja::{Environment, context};

use apigen_core::ir::{IrOperation, NormalizedName};

use crate::EmitError;
use crate::uploads::{file_upload_properties, operation_supports_multipart};

/// Emit a group's multipart helper module: the upload-field cardinality
/// tables and count checks the implementation uses at request time. Only
/// called for groups flagged as containing a multipart operation.
pub fn emit_multipart_helper(
    group: &NormalizedName,
    operations: &[&IrOperation],
) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template(
        "multipart-helper.ts.j2",
        include_str!("../../templates/multipart-helper.ts.j2"),
    )
    .expect("template should be valid");
    let tmpl = env
        .get_template("multipart-helper.ts.j2")
        .expect("template was just added");

    let op_contexts: Vec<minijinja::Value> = operations
        .iter()
        .filter(|op| operation_supports_multipart(op))
        .map(|op| {
            let uploads: Vec<minijinja::Value> = op
                .request_body
                .as_ref()
                .map(|body| file_upload_properties(&body.properties))
                .unwrap_or_default()
                .iter()
                .map(|f| {
                    context! {
                        name => f.name.clone(),
                        min_count => f.min_count,
                        max_count => f.max_count,
                        is_array => f.is_array,
                    }
                })
                .collect();
            context! {
                name => op.name.camel_case.clone(),
                pascal => op.name.pascal_case.clone(),
                uploads => uploads,
            }
        })
        .collect();

    Ok(tmpl.render(context! {
        group => group.original.clone(),
        operations => op_contexts,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::{
        HttpMethod, IrBodyProperty, IrRequestBody, IrType, PropertyShape, SchemaPurpose,
    };
    use apigen_core::transform::name_normalizer::normalize_name;

    #[test]
    fn helper_declares_bounds_and_checks() {
        let op = IrOperation {
            name: normalize_name("uploadMedia"),
            method: HttpMethod::Post,
            path: "/media".to_string(),
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: Some(IrRequestBody {
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
                            max_items: Some(5),
                        },
                        false,
                        None,
                        Some(IrType::File),
                    ),
                ],
            }),
            response: None,
            security: vec![],
            deprecated: false,
        };
        let ops = vec![&op];
        let out = emit_multipart_helper(&normalize_name("media"), &ops).unwrap();

        assert!(out.contains(
            "file: { minCount: null, maxCount: 1, isArray: false },"
        ));
        assert!(out.contains(
            "gallery: { minCount: 1, maxCount: 5, isArray: true },"
        ));
        assert!(out.contains("export function checkUploadMediaUploads"));
    }
}
