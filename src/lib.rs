pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod ffi;
pub mod model;
pub mod utils;

pub use config::AppConfig;
pub use context::AppContext;
pub use data::form::{FormInput, Position, RawForm};
pub use error::{Result, SegmentError};
pub use model::prediction::{ClassProbability, Prediction};
