//! Deterministic, pure logic shared by the runner.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod invariants;
pub mod needs;
pub mod placeholder;
pub mod suggest;
