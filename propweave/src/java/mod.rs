//! Java backend: an in-memory class model the engine can query and mutate.
//!
//! Models are plain serde data, so a build tool can hand the engine a JSON
//! description of its classes and get the transformed model (or rendered
//! source) back.

mod ast;
mod emit;
mod host;
mod render;

pub use ast::{JavaClass, JavaExpr, JavaField, JavaMethod, JavaParam, JavaStmt, JavaUnit, Modifier, is_primitive};
pub use host::JavaNode;
pub use render::{JavaSourceBuilder, expr_text, render_unit};
