pub mod operations;
pub mod route_order;
pub mod schemas;
pub mod types;

pub use operations::*;
pub use route_order::{compare_operations, compare_route_paths, sort_for_registration};
pub use schemas::*;
pub use types::{
    IrApiKeyLocation, IrAuthKind, IrInfo, IrModule, IrSecurityScheme, IrServer, IrSpec,
    NormalizedName,
};
