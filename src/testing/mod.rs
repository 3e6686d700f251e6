//! Testability harness utilities.
//!
//! Deterministic synthetic clips shared by unit tests, integration tests and
//! the `voice_cli synth` subcommand.

pub mod fixtures;
