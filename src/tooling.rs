//! CLI tooling for the reconciliation toolset.

pub mod cli;
