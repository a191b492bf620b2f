//! reqres Common Library
//!
//! Models, request/response contracts and JSON schemas shared by the reqres
//! API contract suite.

pub mod contract;
pub mod error;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use contract::{
    build_request_contract, build_response_contract, BaseConfig, RequestContract,
    ResponseContract,
};
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
