// orderflow/src/pipeline/mod.rs

//! `Pipeline<TData, Err>`: step definitions, handler registration, execution
//! and the compensation unwind.

mod compensation;
pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
