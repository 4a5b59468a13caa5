pub mod features;
pub mod form;
pub mod preprocessing;
pub mod schema;
