//! Flat-row to hierarchy tree construction.

use crate::config::MigrationConfig;
use crate::tree::{FlatRow, HierarchyNode};
use tracing::debug;

/// Builds a hierarchy tree from flat, path-delimited rows.
///
/// Intermediate nodes are created eagerly while walking each row's path;
/// a final prune removes any children sequence left present but empty.
pub struct PathTreeBuilder {
    separator: String,
    legacy_separator: String,
}

impl PathTreeBuilder {
    pub fn new(config: &MigrationConfig) -> Self {
        PathTreeBuilder {
            separator: config.separator.clone(),
            legacy_separator: config.legacy_separator.clone(),
        }
    }

    /// Consume rows in order and return the synthetic root.
    ///
    /// Row order matters only where multiple rows map to one terminal
    /// node: the last row wins per non-empty field. Sibling order is
    /// first-seen order among distinct titles at a level.
    pub fn build(&self, rows: &[FlatRow]) -> HierarchyNode {
        let mut root = HierarchyNode::root();
        for row in rows {
            self.insert_row(&mut root, row);
        }
        prune_empty_children(&mut root);
        root
    }

    fn insert_row(&self, root: &mut HierarchyNode, row: &FlatRow) {
        let segments = self.split_segments(&row.path);
        if segments.is_empty() {
            debug!(path = %row.path, "skipping row with no usable path segments");
            return;
        }

        let mut node = root;
        let mut walked: Vec<&str> = Vec::with_capacity(segments.len());
        for (depth, segment) in segments.iter().enumerate() {
            walked.push(segment);
            let terminal = depth + 1 == segments.len();
            let children = node.children.get_or_insert_with(Vec::new);
            let position = children
                .iter()
                .position(|child| child.title.trim() == *segment);
            let index = match position {
                Some(index) => index,
                None => {
                    let title = if terminal {
                        row.title.clone()
                    } else {
                        (*segment).to_string()
                    };
                    children.push(HierarchyNode::with_title_and_path(
                        title,
                        walked.join(&self.separator),
                    ));
                    children.len() - 1
                }
            };
            node = &mut children[index];
            if terminal {
                apply_row_attributes(node, row);
            }
        }
    }

    /// Split on the configured separator; rows that never use it are
    /// legacy rows delimited by the single-character form.
    fn split_segments<'a>(&self, path: &'a str) -> Vec<&'a str> {
        let separator = if path.contains(self.separator.as_str()) {
            self.separator.as_str()
        } else {
            self.legacy_separator.as_str()
        };
        path.split(separator)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

/// Terminal-segment attribute application: title always follows the row;
/// each leaf field follows the row only when the row supplies a non-empty
/// value, so missing fields never clear previously set ones.
fn apply_row_attributes(node: &mut HierarchyNode, row: &FlatRow) {
    node.title = row.title.clone();
    if let Some(value) = row.image_url.as_deref().filter(|v| !v.is_empty()) {
        node.image_url = Some(value.to_string());
    }
    if let Some(value) = row.link_url.as_deref().filter(|v| !v.is_empty()) {
        node.link_url = Some(value.to_string());
    }
    if let Some(value) = row.text.as_deref().filter(|v| !v.is_empty()) {
        node.text = Some(value.to_string());
    }
    if let Some(value) = row.node_type.as_deref().filter(|v| !v.is_empty()) {
        node.node_type = Some(value.to_string());
    }
}

/// Remove every present-but-empty children sequence in the subtree.
pub fn prune_empty_children(node: &mut HierarchyNode) {
    if let Some(children) = node.children.as_mut() {
        for child in children.iter_mut() {
            prune_empty_children(child);
        }
    }
    if node.children.as_ref().is_some_and(|children| children.is_empty()) {
        node.children = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, title: &str, link_url: Option<&str>) -> FlatRow {
        FlatRow {
            path: path.to_string(),
            title: title.to_string(),
            image_url: None,
            link_url: link_url.map(String::from),
            text: None,
            node_type: None,
        }
    }

    fn builder() -> PathTreeBuilder {
        PathTreeBuilder::new(&MigrationConfig::default())
    }

    #[test]
    fn builds_shared_parent_with_two_leaves() {
        let rows = vec![
            row("A>>>B", "B", Some("/x")),
            row("A>>>C", "C", Some("/y")),
        ];
        let root = builder().build(&rows);

        let top = root.children.as_ref().unwrap();
        assert_eq!(top.len(), 1);
        let a = &top[0];
        assert_eq!(a.title, "A");
        assert_eq!(a.path, "A");
        assert!(a.link_url.is_none());

        let leaves = a.children.as_ref().unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].title, "B");
        assert_eq!(leaves[0].path, "A>>>B");
        assert_eq!(leaves[0].link_url.as_deref(), Some("/x"));
        assert!(leaves[0].is_leaf());
        assert_eq!(leaves[1].title, "C");
        assert_eq!(leaves[1].link_url.as_deref(), Some("/y"));
    }

    #[test]
    fn legacy_single_char_separator_is_accepted() {
        let rows = vec![row("A > B", "B", Some("/x"))];
        let root = builder().build(&rows);
        let a = &root.children.as_ref().unwrap()[0];
        assert_eq!(a.title, "A");
        // Rebuilt paths use the canonical separator.
        assert_eq!(a.children.as_ref().unwrap()[0].path, "A>>>B");
    }

    #[test]
    fn no_node_keeps_empty_children() {
        // "A>>>B" creates intermediate "A"; nothing ever lands under "B".
        let rows = vec![row("A>>>B", "B", None)];
        let mut root = builder().build(&rows);

        fn assert_no_empty(node: &HierarchyNode) {
            if let Some(children) = &node.children {
                assert!(!children.is_empty(), "empty children on {:?}", node.title);
                children.iter().for_each(assert_no_empty);
            }
        }
        assert_no_empty(&root);

        // Prune is also safe to run twice.
        prune_empty_children(&mut root);
        assert_no_empty(&root);
    }

    #[test]
    fn last_row_wins_per_field_not_per_row() {
        let mut first = row("A>>>B", "B", Some("/old"));
        first.text = Some("kept".to_string());
        let second = row("A>>>B", "B renamed", Some("/new"));
        let root = builder().build(&[first, second]);

        let a = &root.children.as_ref().unwrap()[0];
        let b = &a.children.as_ref().unwrap()[0];
        assert_eq!(b.title, "B renamed");
        assert_eq!(b.link_url.as_deref(), Some("/new"));
        // Second row carried no text; the first row's value survives.
        assert_eq!(b.text.as_deref(), Some("kept"));
    }

    #[test]
    fn empty_field_does_not_clear_previous_value() {
        let first = row("A>>>B", "B", Some("/x"));
        let second = row("A>>>B", "B", Some(""));
        let root = builder().build(&[first, second]);
        let a = &root.children.as_ref().unwrap()[0];
        let b = &a.children.as_ref().unwrap()[0];
        assert_eq!(b.link_url.as_deref(), Some("/x"));
    }

    #[test]
    fn whitespace_segments_are_trimmed_and_empties_discarded() {
        let rows = vec![row(" A >>> >>> B ", "B", None)];
        let root = builder().build(&rows);
        let a = &root.children.as_ref().unwrap()[0];
        assert_eq!(a.title, "A");
        assert_eq!(a.children.as_ref().unwrap()[0].title, "B");
    }

    #[test]
    fn rows_with_empty_paths_are_skipped() {
        let rows = vec![row("", "nothing", None), row(">>>", "nothing", None)];
        let root = builder().build(&rows);
        assert!(root.children.is_none());
    }
}
