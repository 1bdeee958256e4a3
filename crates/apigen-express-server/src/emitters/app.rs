use minijinja::{Environment, context};

use apigen_core::ir::{IrSpec, NormalizedName};

use crate::EmitError;

/// Emit `index.ts` — the Express app entry point that mounts every
/// non-empty group router.
pub fn emit_app(ir: &IrSpec, groups: &[&NormalizedName]) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template("app.ts.j2", include_str!("../../templates/app.ts.j2"))
        .expect("template should be valid");
    let tmpl = env
        .get_template("app.ts.j2")
        .expect("template was just added");

    let group_contexts: Vec<minijinja::Value> = groups
        .iter()
        .map(|g| {
            context! {
                camel => g.camel_case.clone(),
                kebab => g.kebab_case.clone(),
            }
        })
        .collect();

    Ok(tmpl.render(context! {
        title => ir.info.title.clone(),
        groups => group_contexts,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::ir::IrInfo;
    use apigen_core::transform::name_normalizer::normalize_name;

    #[test]
    fn app_mounts_group_routers() {
        let ir = IrSpec {
            info: IrInfo {
                title: "Petstore".to_string(),
                description: None,
                version: "1.0.0".to_string(),
            },
            servers: vec![],
            schemas: vec![],
            operations: vec![],
            modules: vec![],
            security_schemes: vec![],
        };
        let pets = normalize_name("pets");
        let store_admin = normalize_name("storeAdmin");
        let out = emit_app(&ir, &[&pets, &store_admin]).unwrap();

        assert!(out.contains("import { router as petsRouter } from \"./api/pets\";"));
        assert!(
            out.contains("import { router as storeAdminRouter } from \"./api/store-admin\";")
        );
        assert!(out.contains("app.use(\"/\", petsRouter);"));
        assert!(out.contains("app.use(passport.initialize());"));
    }
}
