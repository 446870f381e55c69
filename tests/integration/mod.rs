//! Library-level tests driving the registry through its public API.

pub mod config_test;
pub mod dispatch_test;
pub mod placeholder_test;
pub mod tokenizer_test;
