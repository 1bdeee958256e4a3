//! File-upload descriptors derived from classified request-body properties.
//!
//! A schema never marks a property as an upload field directly: the property
//! is a metadata wrapper whose value schema is file content, and the
//! array/non-array distinction plus the array's item bounds are exactly what
//! the multipart middleware needs at request time. Flattening that
//! indirection here keeps schema traversal out of the generated server.

use apigen_core::ir::{IrBodyProperty, IrOperation, IrType, PropertyShape, SchemaPurpose};

/// A request-body property that accepts uploaded file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadProperty {
    /// Name of the file upload property.
    pub name: String,
    /// Minimum number of files when the property takes an array of files.
    pub min_count: Option<u64>,
    /// Maximum number of files; `Some(1)` for scalar uploads, `None` for an
    /// unbounded array.
    pub max_count: Option<u64>,
    /// Does the property take an array of files?
    pub is_array: bool,
}

/// Derive upload descriptors from a form body's properties, preserving
/// property order. Each property contributes at most one descriptor.
pub fn file_upload_properties(properties: &[IrBodyProperty]) -> Vec<FileUploadProperty> {
    let mut results = Vec::new();

    for property in properties {
        if property.purpose != SchemaPurpose::Metadata {
            continue;
        }
        let Some(value) = property.value_schema() else {
            continue;
        };

        match property.shape {
            PropertyShape::Object if *value == IrType::File => {
                results.push(FileUploadProperty {
                    name: property.name.clone(),
                    min_count: None,
                    max_count: Some(1),
                    is_array: false,
                });
            }
            PropertyShape::Array {
                min_items,
                max_items,
            } if *value == IrType::File => {
                results.push(FileUploadProperty {
                    name: property.name.clone(),
                    min_count: min_items,
                    max_count: max_items,
                    is_array: true,
                });
            }
            _ => {}
        }
    }

    results
}

/// True if any operation's request body carries `multipart/*` content.
/// Gates whether multipart helpers and parsing middleware are emitted for a
/// group at all.
pub fn contains_multipart_operation(operations: &[&IrOperation]) -> bool {
    operations.iter().any(|op| {
        op.request_body
            .as_ref()
            .is_some_and(|body| body.content_type.starts_with("multipart/"))
    })
}

/// Per-operation variant of [`contains_multipart_operation`].
pub fn operation_supports_multipart(operation: &IrOperation) -> bool {
    contains_multipart_operation(&[operation])
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::{HttpMethod, IrRequestBody};
    use apigen_core::transform::name_normalizer::normalize_name;

    fn metadata_file(name: &str) -> IrBodyProperty {
        IrBodyProperty::new(
            name.to_string(),
            SchemaPurpose::Metadata,
            PropertyShape::Object,
            true,
            None,
            Some(IrType::File),
        )
    }

    fn metadata_file_array(
        name: &str,
        min_items: Option<u64>,
        max_items: Option<u64>,
    ) -> IrBodyProperty {
        IrBodyProperty::new(
            name.to_string(),
            SchemaPurpose::Metadata,
            PropertyShape::Array {
                min_items,
                max_items,
            },
            false,
            None,
            Some(IrType::File),
        )
    }

    fn op_with_content_type(content_type: Option<&str>) -> IrOperation {
        IrOperation {
            name: normalize_name("upload"),
            method: HttpMethod::Post,
            path: "/upload".to_string(),
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: content_type.map(|ct| IrRequestBody {
                body_type: IrType::Any,
                required: true,
                content_type: ct.to_string(),
                description: None,
                properties: vec![],
            }),
            response: None,
            security: vec![],
            deprecated: false,
        }
    }

    #[test]
    fn scalar_upload_yields_single_descriptor() {
        let props = vec![metadata_file("avatar")];
        let uploads = file_upload_properties(&props);
        assert_eq!(
            uploads,
            vec![FileUploadProperty {
                name: "avatar".to_string(),
                min_count: None,
                max_count: Some(1),
                is_array: false,
            }]
        );
    }

    #[test]
    fn array_upload_copies_bounds_verbatim() {
        let props = vec![metadata_file_array("photos", Some(1), Some(5))];
        let uploads = file_upload_properties(&props);
        assert_eq!(
            uploads,
            vec![FileUploadProperty {
                name: "photos".to_string(),
                min_count: Some(1),
                max_count: Some(5),
                is_array: true,
            }]
        );
    }

    #[test]
    fn unbounded_array_upload_keeps_nones() {
        let props = vec![metadata_file_array("attachments", None, None)];
        let uploads = file_upload_properties(&props);
        assert_eq!(uploads[0].min_count, None);
        assert_eq!(uploads[0].max_count, None);
        assert!(uploads[0].is_array);
    }

    #[test]
    fn non_file_value_yields_nothing() {
        let props = vec![IrBodyProperty::new(
            "caption".to_string(),
            SchemaPurpose::Metadata,
            PropertyShape::Object,
            false,
            None,
            Some(IrType::String),
        )];
        assert!(file_upload_properties(&props).is_empty());
    }

    #[test]
    fn non_metadata_purpose_yields_nothing() {
        let props = vec![IrBodyProperty::new(
            "name".to_string(),
            SchemaPurpose::Value,
            PropertyShape::Leaf,
            false,
            None,
            None,
        )];
        assert!(file_upload_properties(&props).is_empty());
    }

    #[test]
    fn empty_properties_yield_empty_list() {
        assert!(file_upload_properties(&[]).is_empty());
    }

    #[test]
    fn mixed_properties_preserve_order() {
        let props = vec![
            metadata_file("cover"),
            IrBodyProperty::new(
                "title".to_string(),
                SchemaPurpose::Metadata,
                PropertyShape::Object,
                false,
                None,
                Some(IrType::String),
            ),
            metadata_file_array("pages", None, Some(20)),
        ];
        let uploads = file_upload_properties(&props);
        let names: Vec<&str> = uploads.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["cover", "pages"]);
    }

    #[test]
    fn multipart_detection() {
        let multipart = op_with_content_type(Some("multipart/form-data"));
        let json = op_with_content_type(Some("application/json"));
        let bodyless = op_with_content_type(None);

        assert!(contains_multipart_operation(&[&json, &multipart]));
        assert!(!contains_multipart_operation(&[&json, &bodyless]));
        assert!(!contains_multipart_operation(&[]));
        assert!(operation_supports_multipart(&multipart));
        assert!(!operation_supports_multipart(&json));
    }
}
