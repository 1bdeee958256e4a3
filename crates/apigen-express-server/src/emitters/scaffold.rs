use minijinja::{Environment, context};

use apigen_core::GeneratedFile;
use apigen_core::config::ServerOptions;
use apigen_core::ir::IrSpec;
use apigen_core::transform::name_normalizer::normalize_name;

use crate::EmitError;

/// Emit project scaffold files: `package.json`, `tsconfig.json`, and —
/// when formatting is enabled — `biome.json`.
pub fn emit_scaffold(
    ir: &IrSpec,
    config: &ServerOptions,
) -> Result<Vec<GeneratedFile>, EmitError> {
    let mut env = Environment::new();
    env.add_template(
        "package.json.j2",
        include_str!("../../templates/package.json.j2"),
    )
    .expect("template should be valid");
    env.add_template(
        "tsconfig.json.j2",
        include_str!("../../templates/tsconfig.json.j2"),
    )
    .expect("template should be valid");

    let name = config
        .package_name
        .clone()
        .unwrap_or_else(|| normalize_name(&ir.info.title).kebab_case);

    let package_json = env
        .get_template("package.json.j2")
        .expect("template was just added")
        .render(context! {
            name => name,
            version => ir.info.version.clone(),
            repository => config.repository.clone(),
        })?;

    let source_dir = if config.source_dir.is_empty() {
        "."
    } else {
        config.source_dir.as_str()
    };
    let tsconfig = env
        .get_template("tsconfig.json.j2")
        .expect("template was just added")
        .render(context! { source_dir => source_dir })?;

    let mut files = vec![
        GeneratedFile::new("package.json", package_json),
        GeneratedFile::new("tsconfig.json", tsconfig),
    ];

    if config.format {
        files.push(GeneratedFile::new(
            "biome.json",
            include_str!("../../templates/biome.json.j2").to_string(),
        ));
    }

    Ok(files)
}
