mod capability;
mod convert;
mod engine;
mod error;
mod indirect;
mod method;
mod types;
mod value;

/// Collaborator contracts consumed by the engine.
pub use capability::{Nullable, Opaque, OpaqueBase, Scanner};
/// Copy entry points and options.
pub use engine::{CopyOptions, copy, copy_with};
/// Error and result aliases.
pub use error::{CopyError, Result, ScanError};
/// Method descriptors attached to struct types.
pub use method::{FlatMethod, Method, MethodFn, MethodMutFn, Receiver};
/// Type descriptors and struct layout construction.
pub use types::{FieldDef, FlatField, NullableFn, OpaqueType, ScanFn, StructBuilder, StructType, Type};
/// Runtime value representation.
pub use value::{RefValue, SeqValue, StructValue, Value};
