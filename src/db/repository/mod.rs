//! Repository layer: entity-scoped database operations.

mod medical_record;

pub use medical_record::*;
