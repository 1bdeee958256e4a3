use crate::error::TransformError;
use crate::ir::{
    IrAliasSchema, IrEnumSchema, IrField, IrObjectSchema, IrSchema, IrType, IrUnionSchema,
};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};

use super::name_normalizer::normalize_name;

/// Convert a parsed `SchemaOrRef` to an `IrType`. References become named
/// types; the models emitter gives every component schema a declaration
/// under the same name.
pub fn schema_or_ref_to_ir_type(schema_or_ref: &SchemaOrRef) -> IrType {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => {
            let name = ref_path.rsplit('/').next().unwrap_or("Unknown");
            IrType::Ref(normalize_name(name).pascal_case)
        }
        SchemaOrRef::Schema(schema) => schema_to_ir_type(schema),
    }
}

/// Convert a parsed inline `Schema` to an `IrType`.
pub fn schema_to_ir_type(schema: &Schema) -> IrType {
    // Composition first
    if !schema.one_of.is_empty() {
        return IrType::Union(schema.one_of.iter().map(schema_or_ref_to_ir_type).collect());
    }
    if !schema.any_of.is_empty() {
        return IrType::Union(schema.any_of.iter().map(schema_or_ref_to_ir_type).collect());
    }
    if schema.all_of.len() == 1 {
        return schema_or_ref_to_ir_type(&schema.all_of[0]);
    }

    // String enums become literal unions
    if !schema.enum_values.is_empty() {
        let mut literals: Vec<IrType> = schema
            .enum_values
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| IrType::StringLiteral(s.to_string()))
            .collect();
        return match literals.len() {
            0 => IrType::String, // non-string enums degrade to string
            1 => literals.remove(0),
            _ => IrType::Union(literals),
        };
    }

    match schema.schema_type.as_ref().and_then(TypeSet::primary) {
        Some(SchemaType::String) => match schema.format.as_deref() {
            Some("date-time" | "date") => IrType::DateTime,
            Some("binary" | "byte") => IrType::Binary,
            _ => IrType::String,
        },
        Some(SchemaType::Number) => IrType::Number,
        Some(SchemaType::Integer) => IrType::Integer,
        Some(SchemaType::Boolean) => IrType::Boolean,
        Some(SchemaType::Null) => IrType::Null,
        Some(SchemaType::Array) => match &schema.items {
            Some(items) => IrType::Array(Box::new(schema_or_ref_to_ir_type(items))),
            None => IrType::Array(Box::new(IrType::Any)),
        },
        Some(SchemaType::Object) => object_to_ir_type(schema),
        None => IrType::Any,
    }
}

fn object_to_ir_type(schema: &Schema) -> IrType {
    if schema.properties.is_empty() {
        // A property-less object with typed additionalProperties is a map.
        if let Some(AdditionalProperties::Schema(ref value_schema)) = schema.additional_properties {
            return IrType::Map(Box::new(schema_or_ref_to_ir_type(value_schema)));
        }
        return IrType::Map(Box::new(IrType::Any));
    }
    let fields: Vec<(String, IrType, bool)> = schema
        .properties
        .iter()
        .map(|(name, prop)| {
            (
                name.clone(),
                schema_or_ref_to_ir_type(prop),
                schema.required.contains(name),
            )
        })
        .collect();
    IrType::Object(fields)
}

/// Convert a named component schema to an `IrSchema` declaration.
pub fn schema_or_ref_to_ir_schema(
    name: &str,
    schema_or_ref: &SchemaOrRef,
) -> Result<IrSchema, TransformError> {
    let normalized = normalize_name(name);
    let schema = match schema_or_ref {
        SchemaOrRef::Ref { .. } => {
            // A component that is itself a ref aliases the target.
            return Ok(IrSchema::Alias(IrAliasSchema {
                name: normalized,
                description: None,
                target: schema_or_ref_to_ir_type(schema_or_ref),
            }));
        }
        SchemaOrRef::Schema(schema) => schema,
    };

    if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
        let variants = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        return Ok(IrSchema::Union(IrUnionSchema {
            name: normalized,
            description: schema.description.clone(),
            variants: variants.iter().map(schema_or_ref_to_ir_type).collect(),
        }));
    }

    if !schema.enum_values.is_empty() {
        let variants: Vec<String> = schema
            .enum_values
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect();
        if variants.is_empty() {
            return Err(TransformError::Other(format!(
                "enum schema '{name}' has no string values"
            )));
        }
        return Ok(IrSchema::Enum(IrEnumSchema {
            name: normalized,
            description: schema.description.clone(),
            variants,
        }));
    }

    if matches!(
        schema.schema_type.as_ref().and_then(TypeSet::primary),
        Some(SchemaType::Object)
    ) || !schema.properties.is_empty()
    {
        let fields = schema
            .properties
            .iter()
            .map(|(prop_name, prop)| {
                let (read_only, write_only) = match prop {
                    SchemaOrRef::Schema(s) => (
                        s.read_only.unwrap_or(false),
                        s.write_only.unwrap_or(false),
                    ),
                    SchemaOrRef::Ref { .. } => (false, false),
                };
                IrField {
                    name: normalize_name(prop_name),
                    original_name: prop_name.clone(),
                    field_type: schema_or_ref_to_ir_type(prop),
                    required: schema.required.contains(prop_name),
                    description: match prop {
                        SchemaOrRef::Schema(s) => s.description.clone(),
                        SchemaOrRef::Ref { .. } => None,
                    },
                    read_only,
                    write_only,
                }
            })
            .collect();

        let additional_properties = match &schema.additional_properties {
            Some(AdditionalProperties::Schema(s)) => Some(schema_or_ref_to_ir_type(s)),
            Some(AdditionalProperties::Bool(true)) => Some(IrType::Any),
            _ => None,
        };

        return Ok(IrSchema::Object(IrObjectSchema {
            name: normalized,
            description: schema.description.clone(),
            fields,
            additional_properties,
        }));
    }

    // Everything else is an alias to its resolved type.
    Ok(IrSchema::Alias(IrAliasSchema {
        name: normalized,
        description: schema.description.clone(),
        target: schema_to_ir_type(schema),
    }))
}
