use log::debug;

use apigen_core::config::ServerOptions;
use apigen_core::ir::{IrOperation, IrSpec, NormalizedName, route_order};
use apigen_core::{CodeGenerator, GeneratedFile};

use crate::EmitError;
use crate::emitters::{self, source_path};
use crate::uploads::contains_multipart_operation;

/// Express + TypeScript server generator.
pub struct ExpressServerGenerator;

impl CodeGenerator for ExpressServerGenerator {
    type Config = ServerOptions;
    type Error = EmitError;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &ServerOptions,
    ) -> Result<Vec<GeneratedFile>, EmitError> {
        let src = config.source_dir.as_str();
        let mut files = Vec::new();

        // Registration order is fixed before anything is emitted; the
        // routers and the app entry both depend on it.
        let mut modules = ir.modules.clone();
        for module in &mut modules {
            route_order::sort_module_operations(module, &ir.operations);
        }

        let mut mounted: Vec<&NormalizedName> = Vec::new();
        for module in &modules {
            let operations: Vec<&IrOperation> = module
                .operations
                .iter()
                .map(|&i| &ir.operations[i])
                .collect();
            if operations.is_empty() {
                debug!("skipping empty group '{}'", module.name.original);
                continue;
            }

            let multipart = contains_multipart_operation(&operations);
            debug!(
                "group '{}': {} operations, multipart: {}",
                module.name.original,
                operations.len(),
                multipart
            );

            files.push(GeneratedFile::new(
                source_path(src, &format!("api/{}/index.ts", module.name.kebab_case)),
                emitters::routes::emit_routes(&module.name, &operations, multipart)?,
            ));
            files.push(GeneratedFile::keep_existing(
                source_path(src, &format!("impl/{}.ts", module.name.kebab_case)),
                emitters::stubs::emit_stubs(&module.name, &operations)?,
            ));
            if multipart {
                files.push(GeneratedFile::new(
                    source_path(
                        src,
                        &format!("impl/helpers/{}-multipart.ts", module.name.kebab_case),
                    ),
                    emitters::multipart::emit_multipart_helper(&module.name, &operations)?,
                ));
            }
            mounted.push(&module.name);
        }

        files.push(GeneratedFile::new(
            source_path(src, "models.ts"),
            emitters::models::emit_models(&ir.schemas)?,
        ));

        let needs_auth = !ir.security_schemes.is_empty()
            || ir.operations.iter().any(|op| !op.security.is_empty());
        if needs_auth {
            files.push(GeneratedFile::new(
                source_path(src, "auth.ts"),
                emitters::auth::emit_auth(&ir.security_schemes)?,
            ));
        }

        files.push(GeneratedFile::new(
            source_path(src, "index.ts"),
            emitters::app::emit_app(ir, &mounted)?,
        ));

        files.extend(emitters::scaffold::emit_scaffold(ir, config)?);

        Ok(files)
    }
}
