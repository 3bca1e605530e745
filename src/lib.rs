//! Treegraft: Content-Migration Reconciliation
//!
//! Rebuilds hierarchical navigation trees from flat, path-delimited rows,
//! grafts independently-extracted subtree fragments into a parent tree by
//! URL-based node matching, and cross-validates link references across
//! three independently produced data sources.

pub mod artifact;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod reconcile;
pub mod report;
pub mod runner;
pub mod tooling;
pub mod tree;
pub mod url;
