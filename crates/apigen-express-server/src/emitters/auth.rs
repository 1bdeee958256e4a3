use minijinja::{Environment, context};

use apigen_core::ir::{IrApiKeyLocation, IrAuthKind, IrSecurityScheme};

use crate::EmitError;

/// Emit `auth.ts` — passport strategy registration plus the `requireAuth`
/// middleware the routers mount.
pub fn emit_auth(schemes: &[IrSecurityScheme]) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template("auth.ts.j2", include_str!("../../templates/auth.ts.j2"))
        .expect("template should be valid");
    let tmpl = env
        .get_template("auth.ts.j2")
        .expect("template was just added");

    let has_bearer = schemes
        .iter()
        .any(|s| matches!(s.kind, IrAuthKind::HttpBearer { .. }));
    let has_basic = schemes
        .iter()
        .any(|s| matches!(s.kind, IrAuthKind::HttpBasic));

    let scheme_contexts: Vec<minijinja::Value> =
        schemes.iter().map(build_scheme_context).collect();
    let api_key_contexts: Vec<minijinja::Value> = schemes
        .iter()
        .filter(|s| matches!(s.kind, IrAuthKind::ApiKey { .. }))
        .map(build_scheme_context)
        .collect();

    Ok(tmpl.render(context! {
        has_bearer => has_bearer,
        has_basic => has_basic,
        schemes => scheme_contexts,
        api_key_schemes => api_key_contexts,
    })?)
}

fn build_scheme_context(scheme: &IrSecurityScheme) -> minijinja::Value {
    let (kind, param, location) = match &scheme.kind {
        IrAuthKind::HttpBearer { .. } => ("bearer", None, None),
        IrAuthKind::HttpBasic => ("basic", None, None),
        IrAuthKind::ApiKey { param, location } => (
            "apiKey",
            Some(param.clone()),
            Some(match location {
                IrApiKeyLocation::Query => "query",
                IrApiKeyLocation::Header => "header",
                IrApiKeyLocation::Cookie => "cookie",
            }),
        ),
    };
    context! {
        name => scheme.name.original.clone(),
        kind => kind,
        param => param,
        location => location,
        description => scheme.description.clone(),
    }
}
