use apigen_core::ir::IrType;

/// Map an `IrType` to its TypeScript source representation.
///
/// Uploaded files surface as `Express.Multer.File` and base64 binary as
/// `string | Buffer`, matching what the generated middleware actually hands
/// the implementation.
pub fn ir_type_to_ts(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "string".to_string(),
        IrType::StringLiteral(s) => format!("\"{s}\""),
        IrType::Number => "number".to_string(),
        IrType::Integer => "number".to_string(),
        IrType::Boolean => "boolean".to_string(),
        IrType::Null => "null".to_string(),
        IrType::DateTime => "string".to_string(),
        IrType::File => "Express.Multer.File".to_string(),
        IrType::Binary => "string | Buffer".to_string(),
        IrType::Any => "unknown".to_string(),
        IrType::Void => "void".to_string(),
        IrType::Ref(name) => name.clone(),
        IrType::Array(inner) => {
            let inner_ts = ir_type_to_ts(inner);
            if inner_ts.contains(' ') {
                format!("Array<{inner_ts}>")
            } else {
                format!("{inner_ts}[]")
            }
        }
        IrType::Map(value_type) => {
            format!("Record<string, {}>", ir_type_to_ts(value_type))
        }
        IrType::Object(fields) => {
            if fields.is_empty() {
                return "Record<string, unknown>".to_string();
            }
            let rendered: Vec<String> = fields
                .iter()
                .map(|(name, field_type, required)| {
                    let marker = if *required { "" } else { "?" };
                    format!("{name}{marker}: {}", ir_type_to_ts(field_type))
                })
                .collect();
            format!("{{ {} }}", rendered.join("; "))
        }
        IrType::Union(variants) => {
            let rendered: Vec<String> = variants.iter().map(ir_type_to_ts).collect();
            rendered.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        assert_eq!(ir_type_to_ts(&IrType::String), "string");
        assert_eq!(ir_type_to_ts(&IrType::Integer), "number");
        assert_eq!(ir_type_to_ts(&IrType::DateTime), "string");
        assert_eq!(ir_type_to_ts(&IrType::Any), "unknown");
    }

    #[test]
    fn test_file_maps_to_multer() {
        assert_eq!(ir_type_to_ts(&IrType::File), "Express.Multer.File");
        assert_eq!(ir_type_to_ts(&IrType::Binary), "string | Buffer");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            ir_type_to_ts(&IrType::Array(Box::new(IrType::Ref("Pet".to_string())))),
            "Pet[]"
        );
        // Union element types need the generic form to parse correctly.
        assert_eq!(
            ir_type_to_ts(&IrType::Array(Box::new(IrType::Binary))),
            "Array<string | Buffer>"
        );
    }

    #[test]
    fn test_inline_object() {
        let t = IrType::Object(vec![
            ("id".to_string(), IrType::String, true),
            ("note".to_string(), IrType::String, false),
        ]);
        assert_eq!(ir_type_to_ts(&t), "{ id: string; note?: string }");
    }

    #[test]
    fn test_union_of_literals() {
        let t = IrType::Union(vec![
            IrType::StringLiteral("asc".to_string()),
            IrType::StringLiteral("desc".to_string()),
        ]);
        assert_eq!(ir_type_to_ts(&t), "\"asc\" | \"desc\"");
    }
}
