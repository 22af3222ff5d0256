//! Domain Layer - Core business logic and entities
//!
//! This module contains the user entity, its value objects, and the validation
//! rules applied before anything reaches the store.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
