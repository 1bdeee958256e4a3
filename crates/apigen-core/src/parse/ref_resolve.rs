use std::collections::HashSet;

use super::content::{RequestBody, RequestBodyOrRef, Response, ResponseOrRef};
use super::operation::{Operation, Parameter, ParameterOrRef, PathItem};
use super::schema::{Schema, SchemaOrRef};
use super::spec::{Components, OpenApiSpec};
use crate::error::ResolveError;

/// Resolves `$ref` pointers against a spec's `components` section.
///
/// Non-schema references (parameters, request bodies, responses) are inlined
/// into the path items they appear in. Schema references are left in place —
/// the transform layer maps them to named IR types and dereferences them on
/// demand via [`RefResolver::deref_schema`], which keeps reference cycles
/// representable in the generated models.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    /// Clone the spec's path items with all non-schema `$ref` nodes inlined.
    pub fn resolve_paths(
        &self,
        spec: &OpenApiSpec,
    ) -> Result<indexmap::IndexMap<String, PathItem>, ResolveError> {
        let mut resolved = spec.paths.clone();
        for item in resolved.values_mut() {
            self.resolve_path_item(item)?;
        }
        Ok(resolved)
    }

    fn resolve_path_item(&self, item: &mut PathItem) -> Result<(), ResolveError> {
        for p in &mut item.parameters {
            *p = self.resolve_parameter_or_ref(p)?;
        }

        macro_rules! resolve_op {
            ($op:expr) => {
                if let Some(ref mut op) = $op {
                    self.resolve_operation(op)?;
                }
            };
        }
        resolve_op!(item.get);
        resolve_op!(item.post);
        resolve_op!(item.put);
        resolve_op!(item.delete);
        resolve_op!(item.patch);
        resolve_op!(item.options);
        resolve_op!(item.head);
        resolve_op!(item.trace);
        Ok(())
    }

    fn resolve_operation(&self, op: &mut Operation) -> Result<(), ResolveError> {
        for p in &mut op.parameters {
            *p = self.resolve_parameter_or_ref(p)?;
        }

        if let Some(ref body) = op.request_body {
            op.request_body = Some(self.resolve_request_body_or_ref(body)?);
        }

        for resp in op.responses.values_mut() {
            *resp = self.resolve_response_or_ref(resp)?;
        }
        Ok(())
    }

    fn resolve_parameter_or_ref(
        &self,
        param: &ParameterOrRef,
    ) -> Result<ParameterOrRef, ResolveError> {
        match param {
            ParameterOrRef::Ref { ref_path } => {
                let resolved = self.lookup_parameter(ref_path)?;
                Ok(ParameterOrRef::Parameter(resolved))
            }
            ParameterOrRef::Parameter(_) => Ok(param.clone()),
        }
    }

    fn resolve_request_body_or_ref(
        &self,
        body: &RequestBodyOrRef,
    ) -> Result<RequestBodyOrRef, ResolveError> {
        match body {
            RequestBodyOrRef::Ref { ref_path } => {
                let resolved = self.lookup_request_body(ref_path)?;
                Ok(RequestBodyOrRef::RequestBody(resolved))
            }
            RequestBodyOrRef::RequestBody(_) => Ok(body.clone()),
        }
    }

    fn resolve_response_or_ref(&self, resp: &ResponseOrRef) -> Result<ResponseOrRef, ResolveError> {
        match resp {
            ResponseOrRef::Ref { ref_path } => {
                let resolved = self.lookup_response(ref_path)?;
                Ok(ResponseOrRef::Response(resolved))
            }
            ResponseOrRef::Response(_) => Ok(resp.clone()),
        }
    }

    /// Follow a schema reference chain to the underlying inline schema.
    /// Detects reference cycles.
    pub fn deref_schema<'b>(&self, schema_or_ref: &'b SchemaOrRef) -> Result<&'b Schema, ResolveError>
    where
        'a: 'b,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = schema_or_ref;
        loop {
            match current {
                SchemaOrRef::Schema(schema) => return Ok(schema),
                SchemaOrRef::Ref { ref_path } => {
                    if !visited.insert(ref_path.as_str()) {
                        return Err(ResolveError::CircularRef(ref_path.clone()));
                    }
                    let name = parse_ref_name(ref_path, "schemas")?;
                    current = self
                        .components
                        .and_then(|c| c.schemas.get(name))
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
    }

    // Lookup helpers

    fn lookup_parameter(&self, ref_path: &str) -> Result<Parameter, ResolveError> {
        let name = parse_ref_name(ref_path, "parameters")?;
        self.components
            .and_then(|c| c.parameters.get(name))
            .and_then(|p| match p {
                ParameterOrRef::Parameter(param) => Some(param.clone()),
                ParameterOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_request_body(&self, ref_path: &str) -> Result<RequestBody, ResolveError> {
        let name = parse_ref_name(ref_path, "requestBodies")?;
        self.components
            .and_then(|c| c.request_bodies.get(name))
            .and_then(|rb| match rb {
                RequestBodyOrRef::RequestBody(body) => Some(body.clone()),
                RequestBodyOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_response(&self, ref_path: &str) -> Result<Response, ResolveError> {
        let name = parse_ref_name(ref_path, "responses")?;
        self.components
            .and_then(|c| c.responses.get(name))
            .and_then(|r| match r {
                ResponseOrRef::Response(resp) => Some(resp.clone()),
                ResponseOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref_name() {
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet", "schemas").unwrap(),
            "Pet"
        );
        assert!(parse_ref_name("#/components/schemas/Pet", "responses").is_err());
        assert!(parse_ref_name("Pet", "schemas").is_err());
    }

    #[test]
    fn test_deref_schema_cycle() {
        let yaml = r##"
openapi: "3.0.3"
info: { title: t, version: "1" }
components:
  schemas:
    A: { $ref: "#/components/schemas/B" }
    B: { $ref: "#/components/schemas/A" }
"##;
        let spec: OpenApiSpec = serde_yaml_ng::from_str(yaml).unwrap();
        let resolver = RefResolver::new(&spec);
        let a = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/A".to_string(),
        };
        match resolver.deref_schema(&a) {
            Err(ResolveError::CircularRef(_)) => {}
            other => panic!("expected CircularRef, got {:?}", other.map(|_| ())),
        }
    }
}
