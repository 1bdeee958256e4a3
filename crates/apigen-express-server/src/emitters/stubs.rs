use std::collections::BTreeSet;

use minijinja::{Environment, context};

use apigen_core::ir::{IrOperation, NormalizedName};

use crate::EmitError;
use crate::type_mapper::ir_type_to_ts;

use super::is_json_mime;
use super::models::collect_refs;

/// Emit a group's implementation stub module. Written once and never
/// overwritten — this is the file users fill in.
pub fn emit_stubs(group: &NormalizedName, operations: &[&IrOperation]) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template("stub.ts.j2", include_str!("../../templates/stub.ts.j2"))
        .expect("template should be valid");
    let tmpl = env
        .get_template("stub.ts.j2")
        .expect("template was just added");

    let mut refs = BTreeSet::new();
    for op in operations {
        if let Some(ref resp) = op.response {
            collect_refs(&resp.response_type, &mut refs);
        }
        if let Some(body) = json_body_type(op) {
            collect_refs(body, &mut refs);
        }
    }
    let model_imports: Vec<String> = refs.into_iter().collect();

    let op_contexts: Vec<minijinja::Value> = operations
        .iter()
        .map(|op| {
            let return_type = op
                .response
                .as_ref()
                .map(|r| ir_type_to_ts(&r.response_type))
                .unwrap_or_else(|| "void".to_string());
            context! {
                name => op.name.camel_case.clone(),
                summary => op.summary.clone(),
                description => op.description.clone(),
                return_type => return_type,
                body_type => json_body_type(op).map(ir_type_to_ts),
            }
        })
        .collect();

    Ok(tmpl.render(context! {
        group => group.original.clone(),
        model_imports => model_imports,
        operations => op_contexts,
    })?)
}

/// The request-body type for operations that accept JSON, used to type the
/// `req.body` hint in the stub.
fn json_body_type(op: &IrOperation) -> Option<&apigen_core::ir::IrType> {
    let body = op.request_body.as_ref()?;
    is_json_mime(&body.content_type).then_some(&body.body_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::{HttpMethod, IrResponse, IrType};
    use apigen_core::transform::name_normalizer::normalize_name;

    #[test]
    fn stub_imports_referenced_models() {
        let op = IrOperation {
            name: normalize_name("listPets"),
            method: HttpMethod::Get,
            path: "/pets".to_string(),
            summary: Some("List all pets".to_string()),
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: None,
            response: Some(IrResponse {
                response_type: IrType::Array(Box::new(IrType::Ref("Pet".to_string()))),
                description: None,
            }),
            security: vec![],
            deprecated: false,
        };
        let ops = vec![&op];
        let out = emit_stubs(&normalize_name("pets"), &ops).unwrap();

        assert!(out.contains("import type { Pet } from \"../models\";"));
        assert!(out.contains("/** List all pets */"));
        assert!(out.contains("export async function listPets(req: Request): Promise<Pet[]> {"));
        assert!(out.contains("throw new Error(\"listPets is not implemented yet\");"));
    }

    #[test]
    fn json_body_gets_typed_hint() {
        use apigen_core::ir::IrRequestBody;

        let op = IrOperation {
            name: normalize_name("createPet"),
            method: HttpMethod::Post,
            path: "/pets".to_string(),
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: Some(IrRequestBody {
                body_type: IrType::Ref("NewPet".to_string()),
                required: true,
                content_type: "application/json".to_string(),
                description: None,
                properties: vec![],
            }),
            response: Some(IrResponse {
                response_type: IrType::Ref("Pet".to_string()),
                description: None,
            }),
            security: vec![],
            deprecated: false,
        };
        let ops = vec![&op];
        let out = emit_stubs(&normalize_name("pets"), &ops).unwrap();

        assert!(out.contains("import type { NewPet, Pet } from \"../models\";"));
        assert!(out.contains("// const body = req.body as NewPet;"));
    }
}
