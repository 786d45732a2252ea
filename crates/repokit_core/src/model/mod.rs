//! Model references and the dynamic shapes repositories exchange.
//!
//! # Responsibility
//! - Resolve which table a repository is bound to, by convention or override.
//! - Carry rows (`Record`) and field mappings (`Attributes`) without a
//!   per-entity Rust type.
//!
//! # Invariants
//! - A `ModelRef` never changes after resolution; rebinding builds a new one.

pub mod model_ref;
pub mod naming;
pub mod record;

pub use model_ref::{ModelRef, RepositoryConfig};
pub use naming::snake_case;
pub use record::{Attributes, Record};
