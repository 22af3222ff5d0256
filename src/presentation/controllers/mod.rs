//! HTTP controllers for handling requests

pub mod users;

pub use users::*;
