//! The schema mutation engine: alter operations and their application.

pub mod engine;
pub mod operation;

pub use engine::{AlterOutcome, AlterTableEngine};
pub use operation::AlterOperation;
