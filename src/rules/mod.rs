pub mod builtin;
mod catalog;
pub mod secrets;

pub use catalog::{default_template, Rule, RuleCatalog};
pub use secrets::{secret_patterns, SecretPattern};
