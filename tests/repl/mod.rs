//! End-to-end tests running the `argline` binary.

pub mod common;
pub mod session_test;
