/// Field generation: the recursive schema walk and the descriptor types
/// it emits.
pub mod context;
pub mod generate;
pub mod types;

pub use context::FieldContext;
pub use generate::{generate_fields, GenerateError};
pub use types::*;
