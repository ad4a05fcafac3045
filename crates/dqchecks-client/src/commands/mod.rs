pub mod common;
pub mod qa;
pub mod reshape;
pub mod schema;
