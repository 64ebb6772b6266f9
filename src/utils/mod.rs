/// Module containing CNPJ validation
pub mod cnpj;
/// Module containing environment based configuration helpers
pub mod config;
/// Module containing logging utilities
pub mod logger;

pub use cnpj::*;
pub use logger::*;
