use apigen_core::ir::{
    IrAuthKind, IrParameterLocation, IrSchema, IrType, PropertyShape, SchemaPurpose,
    route_order,
};
use apigen_core::parse;
use apigen_core::transform;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const UPLOADS: &str = include_str!("fixtures/uploads.yaml");

#[test]
fn transform_petstore() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let ir = transform::transform(&spec).unwrap();

    assert_eq!(ir.info.title, "Petstore");
    assert_eq!(ir.servers.len(), 1);

    // Schemas
    let pet = ir
        .schemas
        .iter()
        .find(|s| s.name().pascal_case == "Pet")
        .expect("should have Pet schema");
    match pet {
        IrSchema::Object(obj) => {
            assert_eq!(obj.fields.len(), 3);
            assert!(obj.fields[0].required);
        }
        _ => panic!("Pet should be an object schema"),
    }

    let status = ir
        .schemas
        .iter()
        .find(|s| s.name().pascal_case == "PetStatus")
        .expect("should have PetStatus schema");
    match status {
        IrSchema::Enum(e) => assert_eq!(e.variants.len(), 3),
        _ => panic!("PetStatus should be an enum"),
    }

    // Operations
    let list_op = ir
        .operations
        .iter()
        .find(|op| op.name.camel_case == "listPets")
        .expect("should have listPets");
    assert_eq!(list_op.parameters.len(), 2);
    assert_eq!(list_op.parameters[0].location, IrParameterLocation::Query);
    match &list_op.response {
        Some(resp) => assert_eq!(
            resp.response_type,
            IrType::Array(Box::new(IrType::Ref("Pet".to_string())))
        ),
        None => panic!("listPets should have a response"),
    }

    let delete_op = ir
        .operations
        .iter()
        .find(|op| op.name.camel_case == "deletePet")
        .expect("should have deletePet");
    assert!(delete_op.response.is_none(), "204 means no response body");
    assert_eq!(delete_op.security.len(), 1);
    assert_eq!(delete_op.security[0].scheme, "bearerAuth");

    // Modules, sorted by name
    let names: Vec<&str> = ir.modules.iter().map(|m| m.name.original.as_str()).collect();
    assert_eq!(names, ["pets", "users"]);

    // Security schemes
    assert_eq!(ir.security_schemes.len(), 1);
    match &ir.security_schemes[0].kind {
        IrAuthKind::HttpBearer { format } => assert_eq!(format.as_deref(), Some("JWT")),
        other => panic!("expected bearer scheme, got {other:?}"),
    }
}

#[test]
fn modules_sort_into_registration_order() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let mut ir = transform::transform(&spec).unwrap();

    let pets = ir
        .modules
        .iter()
        .position(|m| m.name.original == "pets")
        .unwrap();

    // Source order starts at /pets/{petId}; registration order must not.
    let mut module = ir.modules[pets].clone();
    route_order::sort_module_operations(&mut module, &ir.operations);
    let paths: Vec<&str> = module
        .operations
        .iter()
        .map(|&i| ir.operations[i].path.as_str())
        .collect();
    assert_eq!(paths, ["/pets", "/pets", "/pets/{petId}", "/pets/{petId}", "/pets/{petId}/owner"]);

    // The users group puts the literal /users/me ahead of /users/{userId}.
    let users = ir
        .modules
        .iter()
        .position(|m| m.name.original == "users")
        .unwrap();
    let mut module = ir.modules[users].clone();
    route_order::sort_module_operations(&mut module, &ir.operations);
    let paths: Vec<&str> = module
        .operations
        .iter()
        .map(|&i| ir.operations[i].path.as_str())
        .collect();
    assert_eq!(paths, ["/users/me", "/users/{userId}"]);

    // Sorting the whole operation table is idempotent.
    route_order::sort_for_registration(&mut ir.operations);
    let once: Vec<String> = ir.operations.iter().map(|o| o.path.clone()).collect();
    route_order::sort_for_registration(&mut ir.operations);
    let twice: Vec<String> = ir.operations.iter().map(|o| o.path.clone()).collect();
    assert_eq!(once, twice);
}

#[test]
fn transform_uploads() {
    let spec = parse::from_yaml(UPLOADS).unwrap();
    let ir = transform::transform(&spec).unwrap();

    let upload = ir
        .operations
        .iter()
        .find(|op| op.name.camel_case == "uploadMedia")
        .expect("should have uploadMedia");

    let body = upload.request_body.as_ref().expect("multipart body");
    assert_eq!(body.content_type, "multipart/form-data");
    assert_eq!(body.properties.len(), 3);

    let file = &body.properties[0];
    assert_eq!(file.name, "file");
    assert_eq!(file.purpose, SchemaPurpose::Metadata);
    assert_eq!(file.shape, PropertyShape::Object);
    assert_eq!(file.value_schema(), Some(&IrType::File));
    assert_eq!(file.part_content_type.as_deref(), Some("image/png"));
    assert!(file.required);

    let title = &body.properties[1];
    assert_eq!(title.value_schema(), Some(&IrType::String));

    let gallery = &body.properties[2];
    assert_eq!(
        gallery.shape,
        PropertyShape::Array {
            min_items: Some(1),
            max_items: Some(5),
        }
    );
    assert_eq!(gallery.value_schema(), Some(&IrType::File));

    // Urlencoded bodies classify as plain values.
    let comment = ir
        .operations
        .iter()
        .find(|op| op.name.camel_case == "addComment")
        .expect("should have addComment");
    let body = comment.request_body.as_ref().expect("form body");
    assert_eq!(body.content_type, "application/x-www-form-urlencoded");
    assert!(body
        .properties
        .iter()
        .all(|p| p.purpose == SchemaPurpose::Value && p.value_schema().is_none()));
}

#[test]
fn operation_names_fall_back_to_routes() {
    let yaml = r#"
openapi: "3.0.3"
info: { title: Minimal, version: "1" }
paths:
  /things:
    get:
      responses:
        "200":
          description: ok
"#;
    let spec = parse::from_yaml(yaml).unwrap();
    let ir = transform::transform(&spec).unwrap();
    assert_eq!(ir.operations[0].name.camel_case, "listThings");
    assert_eq!(ir.modules[0].name.original, "default");
}
