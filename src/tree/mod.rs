//! Hierarchy tree model.
//!
//! Trees are plain value structures with no back-references: a subtree
//! moved between trees is always deep-copied, never aliased. The serde
//! field names are the stable artifact contract shared with the other
//! migration tooling.

pub mod builder;
pub mod merger;

use serde::{Deserialize, Serialize};

/// One node of a navigation hierarchy.
///
/// `children` is `None` for leaves; a present-but-empty children sequence
/// is never persisted. The leaf attributes only carry meaning when
/// `children` is absent: a node with children must not keep `linkURL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(default)]
    pub title: String,

    /// Full breadcrumb: ancestor titles joined by the separator.
    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<HierarchyNode>>,

    #[serde(
        default,
        rename = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,

    #[serde(
        default,
        rename = "linkURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

impl HierarchyNode {
    /// Synthetic root for tree construction.
    pub fn root() -> Self {
        HierarchyNode {
            title: String::new(),
            path: String::new(),
            children: Some(Vec::new()),
            image_url: None,
            link_url: None,
            text: None,
            node_type: None,
        }
    }

    /// Intermediate or terminal node created during a path walk.
    pub fn with_title_and_path(title: impl Into<String>, path: impl Into<String>) -> Self {
        HierarchyNode {
            title: title.into(),
            path: path.into(),
            children: None,
            image_url: None,
            link_url: None,
            text: None,
            node_type: None,
        }
    }

    /// True when the node has no children sequence at all.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Count of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(HierarchyNode::node_count)
            .sum::<usize>()
    }
}

/// One flat, path-delimited input row. Read once, consumed by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub path: String,

    #[serde(default)]
    pub title: String,

    #[serde(
        default,
        rename = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,

    #[serde(
        default,
        rename = "linkURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}
