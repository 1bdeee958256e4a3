use super::types::NormalizedName;

/// A resolved schema in the IR.
#[derive(Debug, Clone)]
pub enum IrSchema {
    Object(IrObjectSchema),
    Enum(IrEnumSchema),
    Alias(IrAliasSchema),
    Union(IrUnionSchema),
}

impl IrSchema {
    pub fn name(&self) -> &NormalizedName {
        match self {
            IrSchema::Object(o) => &o.name,
            IrSchema::Enum(e) => &e.name,
            IrSchema::Alias(a) => &a.name,
            IrSchema::Union(u) => &u.name,
        }
    }
}

/// An object schema with typed fields.
#[derive(Debug, Clone)]
pub struct IrObjectSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub fields: Vec<IrField>,
    pub additional_properties: Option<IrType>,
}

/// A field on an object schema.
#[derive(Debug, Clone)]
pub struct IrField {
    pub name: NormalizedName,
    pub original_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub description: Option<String>,
    pub read_only: bool,
    pub write_only: bool,
}

/// A string enum schema.
#[derive(Debug, Clone)]
pub struct IrEnumSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub variants: Vec<String>,
}

/// A type alias (e.g., `type Foo = string`).
#[derive(Debug, Clone)]
pub struct IrAliasSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub target: IrType,
}

/// A union type (oneOf / anyOf).
#[derive(Debug, Clone)]
pub struct IrUnionSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub variants: Vec<IrType>,
}

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    String,
    StringLiteral(String),
    Number,
    Integer,
    Boolean,
    Null,
    Array(Box<IrType>),
    Object(Vec<(String, IrType, bool)>), // inline object: (name, type, required)
    Map(Box<IrType>),                    // Record<string, T>
    Ref(String),                         // reference to a named schema (PascalCase)
    Union(Vec<IrType>),
    Any,
    Void,
    DateTime,
    /// An uploaded file part of a multipart body (`format: binary`).
    File,
    /// Base64-encoded binary content (`format: byte`).
    Binary,
}

/// Whether a request-body property is a plain value or a metadata wrapper
/// around one.
///
/// Multipart parts are modelled as metadata wrappers: the part carries its
/// own content type and headers alongside the value, and the value schema is
/// reached by unwrapping one level. Every other body property is a plain
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPurpose {
    Value,
    Metadata,
}

/// The shape of a request-body property's own schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyShape {
    /// A plain, non-array container (the metadata wrapper for scalar parts).
    Object,
    /// An array with optional cardinality bounds; `None` means unbounded on
    /// that side.
    Array {
        min_items: Option<u64>,
        max_items: Option<u64>,
    },
    Enum,
    Leaf,
}

/// A named property of a form-style request body, classified for
/// middleware wiring.
#[derive(Debug, Clone)]
pub struct IrBodyProperty {
    pub name: String,
    pub purpose: SchemaPurpose,
    pub shape: PropertyShape,
    pub required: bool,
    /// Part content type from the body's `encoding` map, when declared.
    pub part_content_type: Option<String>,
    value_type: Option<IrType>,
}

impl IrBodyProperty {
    pub fn new(
        name: String,
        purpose: SchemaPurpose,
        shape: PropertyShape,
        required: bool,
        part_content_type: Option<String>,
        value_type: Option<IrType>,
    ) -> Self {
        Self {
            name,
            purpose,
            shape,
            required,
            part_content_type,
            value_type,
        }
    }

    /// Unwrap one level of metadata wrapping to reach the carried value
    /// type. Plain-value properties have nothing to unwrap.
    pub fn value_schema(&self) -> Option<&IrType> {
        match self.purpose {
            SchemaPurpose::Metadata => self.value_type.as_ref(),
            SchemaPurpose::Value => None,
        }
    }
}
