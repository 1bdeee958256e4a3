//! Classification of form-style request-body properties.
//!
//! Multipart parts arrive on the wire with their own content type and
//! headers, so the IR models them as metadata wrappers around a value
//! schema; urlencoded fields are plain values. The upload-middleware wiring
//! in the server generator is driven entirely by this classification.

use log::warn;

use crate::ir::{IrBodyProperty, IrType, PropertyShape, SchemaPurpose};
use crate::parse::content::MediaType;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};

use super::schema_resolver::schema_or_ref_to_ir_type;

/// True when the MIME type denotes a form-style body whose properties are
/// delivered as separate parts or fields.
pub fn is_form_content(mime: &str) -> bool {
    mime.starts_with("multipart/") || mime == "application/x-www-form-urlencoded"
}

/// Classify the properties of a form-style request body. Returns an empty
/// list for non-form content and preserves the schema's property order.
pub fn classify_body_properties(
    resolver: &RefResolver<'_>,
    content_type: &str,
    media: &MediaType,
) -> Vec<IrBodyProperty> {
    if !is_form_content(content_type) {
        return Vec::new();
    }

    let Some(ref body_schema) = media.schema else {
        return Vec::new();
    };

    let body = match resolver.deref_schema(body_schema) {
        Ok(schema) => schema,
        Err(e) => {
            warn!("skipping form body properties, unresolvable schema: {e}");
            return Vec::new();
        }
    };

    let multipart = content_type.starts_with("multipart/");
    let mut properties = Vec::with_capacity(body.properties.len());

    for (name, prop_schema) in &body.properties {
        let prop = match resolver.deref_schema(prop_schema) {
            Ok(schema) => schema,
            Err(e) => {
                warn!("skipping form property '{name}', unresolvable schema: {e}");
                continue;
            }
        };

        let required = body.required.contains(name);
        let part_content_type = media
            .encoding
            .get(name)
            .and_then(|enc| enc.content_type.clone());

        let property = if multipart {
            classify_part(resolver, name, prop_schema, prop, required, part_content_type)
        } else {
            classify_field(name, prop, required, part_content_type)
        };
        properties.push(property);
    }

    properties
}

/// A multipart part: a metadata wrapper whose value schema is reached by
/// unwrapping one level. Arrays keep their declared cardinality bounds.
fn classify_part(
    resolver: &RefResolver<'_>,
    name: &str,
    prop_schema: &SchemaOrRef,
    prop: &Schema,
    required: bool,
    part_content_type: Option<String>,
) -> IrBodyProperty {
    if is_array(prop) {
        let value_type = prop
            .items
            .as_deref()
            .map(|items| part_value_type(resolver, items));
        IrBodyProperty::new(
            name.to_string(),
            SchemaPurpose::Metadata,
            PropertyShape::Array {
                min_items: prop.min_items,
                max_items: prop.max_items,
            },
            required,
            part_content_type,
            value_type,
        )
    } else {
        IrBodyProperty::new(
            name.to_string(),
            SchemaPurpose::Metadata,
            PropertyShape::Object,
            required,
            part_content_type,
            Some(part_value_type(resolver, prop_schema)),
        )
    }
}

/// A urlencoded field: a plain value with no metadata wrapping.
fn classify_field(
    name: &str,
    prop: &Schema,
    required: bool,
    part_content_type: Option<String>,
) -> IrBodyProperty {
    let shape = if is_array(prop) {
        PropertyShape::Array {
            min_items: prop.min_items,
            max_items: prop.max_items,
        }
    } else if !prop.enum_values.is_empty() {
        PropertyShape::Enum
    } else if is_object(prop) {
        PropertyShape::Object
    } else {
        PropertyShape::Leaf
    };

    IrBodyProperty::new(
        name.to_string(),
        SchemaPurpose::Value,
        shape,
        required,
        part_content_type,
        None,
    )
}

/// The value type carried by a multipart part once the metadata wrapping is
/// removed. `format: binary` parts are uploaded files.
fn part_value_type(resolver: &RefResolver<'_>, schema_or_ref: &SchemaOrRef) -> IrType {
    match resolver.deref_schema(schema_or_ref) {
        Ok(schema) if is_binary_string(schema) => IrType::File,
        _ => schema_or_ref_to_ir_type(schema_or_ref),
    }
}

fn is_binary_string(schema: &Schema) -> bool {
    matches!(
        schema.schema_type.as_ref().and_then(TypeSet::primary),
        Some(SchemaType::String)
    ) && schema.format.as_deref() == Some("binary")
}

fn is_array(schema: &Schema) -> bool {
    matches!(
        schema.schema_type.as_ref().and_then(TypeSet::primary),
        Some(SchemaType::Array)
    )
}

fn is_object(schema: &Schema) -> bool {
    matches!(
        schema.schema_type.as_ref().and_then(TypeSet::primary),
        Some(SchemaType::Object)
    ) || !schema.properties.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::spec::OpenApiSpec;

    fn media(yaml: &str) -> MediaType {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    fn empty_spec() -> OpenApiSpec {
        serde_yaml_ng::from_str("openapi: \"3.0.3\"\ninfo: { title: t, version: \"1\" }")
            .unwrap()
    }

    #[test]
    fn test_multipart_scalar_file_part() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let mt = media(
            r#"
schema:
  type: object
  required: [avatar]
  properties:
    avatar: { type: string, format: binary }
    caption: { type: string }
"#,
        );
        let props = classify_body_properties(&resolver, "multipart/form-data", &mt);
        assert_eq!(props.len(), 2);

        assert_eq!(props[0].name, "avatar");
        assert_eq!(props[0].purpose, SchemaPurpose::Metadata);
        assert_eq!(props[0].shape, PropertyShape::Object);
        assert!(props[0].required);
        assert_eq!(props[0].value_schema(), Some(&IrType::File));

        assert_eq!(props[1].name, "caption");
        assert_eq!(props[1].value_schema(), Some(&IrType::String));
    }

    #[test]
    fn test_multipart_array_part_keeps_bounds() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let mt = media(
            r#"
schema:
  type: object
  properties:
    photos:
      type: array
      minItems: 1
      maxItems: 5
      items: { type: string, format: binary }
"#,
        );
        let props = classify_body_properties(&resolver, "multipart/form-data", &mt);
        assert_eq!(props.len(), 1);
        assert_eq!(
            props[0].shape,
            PropertyShape::Array {
                min_items: Some(1),
                max_items: Some(5),
            }
        );
        assert_eq!(props[0].value_schema(), Some(&IrType::File));
    }

    #[test]
    fn test_urlencoded_fields_are_plain_values() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let mt = media(
            r#"
schema:
  type: object
  properties:
    name: { type: string }
    status: { type: string, enum: [active, retired] }
"#,
        );
        let props =
            classify_body_properties(&resolver, "application/x-www-form-urlencoded", &mt);
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].purpose, SchemaPurpose::Value);
        assert_eq!(props[0].shape, PropertyShape::Leaf);
        assert_eq!(props[0].value_schema(), None);
        assert_eq!(props[1].shape, PropertyShape::Enum);
    }

    #[test]
    fn test_json_body_has_no_form_properties() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let mt = media("schema: { type: object, properties: { a: { type: string } } }");
        assert!(classify_body_properties(&resolver, "application/json", &mt).is_empty());
    }
}
