//! Subtree grafting by URL-based node matching.
//!
//! Each fragment was extracted independently and carries paths rooted at
//! its own top. Grafting locates the parent node whose `linkURL` matches a
//! candidate URL derived from the fragment's directory name, deep-copies
//! the fragment's children under it, and rewrites every copied path with
//! the matched node's breadcrumb as prefix.

use crate::config::MigrationConfig;
use crate::tree::HierarchyNode;
use crate::url::fragment_candidates;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of one fragment merge attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MergeOutcome {
    /// Fragment grafted under the node at `target_path`.
    Grafted { target_path: String },
    /// No parent node matched either candidate URL.
    NoMatch,
    /// Fragment tree had no top-level children; nothing to graft.
    EmptyFragment,
}

/// Result of a whole merge batch against one parent tree.
#[derive(Debug, Clone, Serialize)]
pub struct MergeBatchReport {
    pub merged: Vec<String>,
    pub skipped: Vec<String>,
}

impl MergeBatchReport {
    pub fn any_merged(&self) -> bool {
        !self.merged.is_empty()
    }
}

pub struct HierarchyMerger {
    config: MigrationConfig,
}

impl HierarchyMerger {
    pub fn new(config: MigrationConfig) -> Self {
        HierarchyMerger { config }
    }

    /// Graft `fragment` into `parent` at the node matching the candidate
    /// URLs derived from `fragment_name`.
    ///
    /// On success the parent tree is mutated in place; on `NoMatch` it is
    /// left untouched. The fragment is never aliased: its children are
    /// deep-copied before rewriting.
    pub fn merge(
        &self,
        parent: &mut HierarchyNode,
        fragment_name: &str,
        fragment: &HierarchyNode,
    ) -> MergeOutcome {
        let candidates = fragment_candidates(fragment_name, &self.config);

        let fragment_children = match fragment.children.as_ref().filter(|c| !c.is_empty()) {
            Some(children) => children,
            None => {
                warn!(fragment = fragment_name, "fragment has no children to graft");
                return MergeOutcome::EmptyFragment;
            }
        };

        let target = match find_by_link_url(parent, &candidates) {
            Some(target) => target,
            None => {
                debug!(
                    fragment = fragment_name,
                    candidates = ?candidates,
                    "no parent node matches fragment candidates"
                );
                return MergeOutcome::NoMatch;
            }
        };

        if target.children.as_ref().is_some_and(|c| !c.is_empty()) {
            // Last merge wins: re-running a merge replaces the earlier graft.
            warn!(
                fragment = fragment_name,
                target_path = %target.path,
                "replacing existing children of matched node"
            );
        }

        let mut grafted = fragment_children.clone();
        let prefix = target.path.clone();
        for child in grafted.iter_mut() {
            rewrite_paths(child, &prefix, &self.config.separator);
        }
        target.children = Some(grafted);
        // The matched node is no longer a leaf; a non-leaf never acts as a
        // link target.
        target.link_url = None;

        info!(fragment = fragment_name, target_path = %prefix, "fragment grafted");
        MergeOutcome::Grafted {
            target_path: prefix,
        }
    }

    /// Merge an ordered batch of fragments against one shared parent tree.
    ///
    /// Fragments are processed strictly in the given order: a later
    /// fragment's search can observe nodes grafted by an earlier one, so
    /// order is a correctness-relevant input, not a detail. No-match
    /// fragments are recorded as skips; the caller treats "zero merges
    /// succeeded" as fatal for the whole batch.
    pub fn merge_batch(
        &self,
        parent: &mut HierarchyNode,
        fragments: &[(String, HierarchyNode)],
    ) -> MergeBatchReport {
        let mut report = MergeBatchReport {
            merged: Vec::new(),
            skipped: Vec::new(),
        };
        for (name, fragment) in fragments {
            match self.merge(parent, name, fragment) {
                MergeOutcome::Grafted { .. } => report.merged.push(name.clone()),
                MergeOutcome::NoMatch | MergeOutcome::EmptyFragment => {
                    report.skipped.push(name.clone())
                }
            }
        }
        report
    }
}

/// Pre-order search for the first node whose `linkURL` equals either
/// candidate. First match wins; the search does not continue past it.
fn find_by_link_url<'a>(
    node: &'a mut HierarchyNode,
    candidates: &[String; 2],
) -> Option<&'a mut HierarchyNode> {
    if node
        .link_url
        .as_deref()
        .is_some_and(|url| url == candidates[0] || url == candidates[1])
    {
        return Some(node);
    }
    if let Some(children) = node.children.as_mut() {
        for child in children.iter_mut() {
            if let Some(found) = find_by_link_url(child, candidates) {
                return Some(found);
            }
        }
    }
    None
}

/// Prefix every path in the subtree with the same fixed prefix. The prefix
/// never varies with depth; using the already-rewritten parent path one
/// level up would compound it on every descent.
fn rewrite_paths(node: &mut HierarchyNode, prefix: &str, separator: &str) {
    node.path = format!("{}{}{}", prefix, separator, node.path);
    if let Some(children) = node.children.as_mut() {
        for child in children.iter_mut() {
            rewrite_paths(child, prefix, separator);
        }
    }
}
