use minijinja::{Environment, context};

use apigen_core::ir::{IrSchema, IrType};

use crate::EmitError;
use crate::type_mapper::ir_type_to_ts;

/// Emit `models.ts` — TypeScript declarations for every component schema.
pub fn emit_models(schemas: &[IrSchema]) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template("models.ts.j2", include_str!("../../templates/models.ts.j2"))
        .expect("template should be valid");
    let tmpl = env
        .get_template("models.ts.j2")
        .expect("template was just added");

    let schema_contexts: Vec<minijinja::Value> =
        schemas.iter().map(build_schema_context).collect();

    Ok(tmpl.render(context! { schemas => schema_contexts })?)
}

fn build_schema_context(schema: &IrSchema) -> minijinja::Value {
    match schema {
        IrSchema::Object(obj) => {
            let fields: Vec<minijinja::Value> = obj
                .fields
                .iter()
                .map(|f| {
                    context! {
                        name => ts_property_name(&f.original_name),
                        required => f.required,
                        ts_type => ir_type_to_ts(&f.field_type),
                        description => f.description.clone(),
                    }
                })
                .collect();
            context! {
                kind => "object",
                name => obj.name.pascal_case.clone(),
                description => obj.description.clone(),
                fields => fields,
                additional => obj.additional_properties.as_ref().map(ir_type_to_ts),
            }
        }
        IrSchema::Enum(e) => {
            let target = e
                .variants
                .iter()
                .map(|v| format!("\"{v}\""))
                .collect::<Vec<_>>()
                .join(" | ");
            context! {
                kind => "alias",
                name => e.name.pascal_case.clone(),
                description => e.description.clone(),
                target => target,
            }
        }
        IrSchema::Alias(a) => context! {
            kind => "alias",
            name => a.name.pascal_case.clone(),
            description => a.description.clone(),
            target => ir_type_to_ts(&a.target),
        },
        IrSchema::Union(u) => {
            let target = u
                .variants
                .iter()
                .map(ir_type_to_ts)
                .collect::<Vec<_>>()
                .join(" | ");
            context! {
                kind => "alias",
                name => u.name.pascal_case.clone(),
                description => u.description.clone(),
                target => target,
            }
        }
    }
}

/// Quote property names that aren't valid TypeScript identifiers.
fn ts_property_name(name: &str) -> String {
    let valid = !name.is_empty()
        && !name.chars().next().is_some_and(|c| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

/// Collect named schema references reachable from a type, for imports.
pub fn collect_refs(ir_type: &IrType, refs: &mut std::collections::BTreeSet<String>) {
    match ir_type {
        IrType::Ref(name) => {
            refs.insert(name.clone());
        }
        IrType::Array(inner) | IrType::Map(inner) => collect_refs(inner, refs),
        IrType::Union(variants) => {
            for v in variants {
                collect_refs(v, refs);
            }
        }
        IrType::Object(fields) => {
            for (_, t, _) in fields {
                collect_refs(t, refs);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::{IrEnumSchema, IrField, IrObjectSchema};
    use apigen_core::transform::name_normalizer::normalize_name;

    #[test]
    fn emits_interface_with_optional_fields() {
        let schema = IrSchema::Object(IrObjectSchema {
            name: normalize_name("Pet"),
            description: Some("A pet.".to_string()),
            fields: vec![
                IrField {
                    name: normalize_name("id"),
                    original_name: "id".to_string(),
                    field_type: IrType::Integer,
                    required: true,
                    description: None,
                    read_only: false,
                    write_only: false,
                },
                IrField {
                    name: normalize_name("display-name"),
                    original_name: "display-name".to_string(),
                    field_type: IrType::String,
                    required: false,
                    description: None,
                    read_only: false,
                    write_only: false,
                },
            ],
            additional_properties: None,
        });

        let out = emit_models(&[schema]).unwrap();
        assert!(out.contains("/** A pet. */"));
        assert!(out.contains("export interface Pet {"));
        assert!(out.contains("  id: number;"));
        assert!(out.contains("  \"display-name\"?: string;"));
    }

    #[test]
    fn emits_enum_as_literal_union() {
        let schema = IrSchema::Enum(IrEnumSchema {
            name: normalize_name("pet-status"),
            description: None,
            variants: vec!["available".to_string(), "sold".to_string()],
        });
        let out = emit_models(&[schema]).unwrap();
        assert!(out.contains("export type PetStatus = \"available\" | \"sold\";"));
    }

    #[test]
    fn collect_refs_walks_nested_types() {
        let t = IrType::Array(Box::new(IrType::Union(vec![
            IrType::Ref("Pet".to_string()),
            IrType::Ref("User".to_string()),
        ])));
        let mut refs = std::collections::BTreeSet::new();
        collect_refs(&t, &mut refs);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), ["Pet", "User"]);
    }
}
