//! Fill-context rules for pagination.
//!
//! A fill element (typically a decorative image) occupies its container's
//! whole content box and is never partially rendered. When overflow lands
//! in a *sibling* of the fill container, the container is duplicated whole
//! onto the continuation; the partitioner handles that. When overflow
//! lands *inside* the fill container, the container's outermost enclosing
//! row moves to the continuation as a unit.

use crate::model::{Node, NodePath, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillPlan {
    /// Split at the boundary, duplicating fill siblings as needed.
    Standard,
    /// Move the subtree at this path, and everything after it, whole.
    AtomicMove(NodePath),
}

/// Decide how to paginate given the path of the first overflowing leaf.
pub fn classify(root: &Section, overflow_path: &[usize]) -> FillPlan {
    let Some(container) = fill_container(root, overflow_path) else {
        return FillPlan::Standard;
    };
    let unit = outermost_row(root, &overflow_path[..container]).unwrap_or(container);
    if unit == 0 {
        log::debug!("fill container is the root; falling back to a standard split");
        return FillPlan::Standard;
    }
    FillPlan::AtomicMove(overflow_path[..unit].to_vec())
}

/// Depth of the shallowest section on the path that directly holds a fill
/// element (0 is the root), excluding the leaf itself.
fn fill_container(root: &Section, path: &[usize]) -> Option<usize> {
    let mut current = root;
    for depth in 0..path.len() {
        if current.holds_fill() {
            return Some(depth);
        }
        match current.children.get(path[depth]) {
            Some(Node::Section(s)) => current = s,
            _ => return None,
        }
    }
    None
}

/// Depth of the outermost row among the sections along `path`, not
/// counting the root.
fn outermost_row(root: &Section, path: &[usize]) -> Option<usize> {
    let mut current = root;
    for (i, &idx) in path.iter().enumerate() {
        match current.children.get(idx) {
            Some(Node::Section(s)) => {
                if s.is_row() {
                    return Some(i + 1);
                }
                current = s;
            }
            _ => return None,
        }
    }
    None
}

/// Cut `section` just before the node at `path`, in pre-order. The first
/// half keeps everything before the node, the second the node and all
/// that follows. Ancestors appear in both halves as needed.
pub fn cut_at(section: &Section, path: &[usize]) -> (Section, Section) {
    let mut before = section.shell();
    let mut from = section.shell();
    let Some((&idx, rest)) = path.split_first() else {
        from.children = section.children.clone();
        return (before, from);
    };
    let idx = idx.min(section.children.len());
    before.children = section.children[..idx].to_vec();

    match section.children.get(idx) {
        Some(Node::Section(child)) if !rest.is_empty() => {
            let (b, f) = cut_at(child, rest);
            if b.leaf_count() > 0 {
                before.children.push(Node::Section(b));
            }
            from.children.push(Node::Section(f));
            from.children.extend(section.children[idx + 1..].iter().cloned());
        }
        _ => from.children = section.children[idx..].to_vec(),
    }
    (before, from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directives;
    use crate::model::{Content, Element, ImageContent, SectionKind, TextRole};

    fn text(s: &str) -> Node {
        Node::Element(Element::text(TextRole::Body, s))
    }

    fn fill_image() -> Node {
        Node::Element(
            Element::new(Content::Image(ImageContent {
                url: "https://example.com/side.png".into(),
                aspect_ratio: None,
                alt: None,
            }))
            .with_directives(Directives::new().with("fill", true)),
        )
    }

    fn col(children: Vec<Node>) -> Node {
        Node::Section(Section::new(SectionKind::Column, children))
    }

    fn tree() -> Section {
        Section::new(
            SectionKind::Section,
            vec![
                text("intro"),
                Node::Section(Section::new(
                    SectionKind::Row,
                    vec![col(vec![text("left a"), text("left b")]), col(vec![fill_image(), text("caption")])],
                )),
                text("outro"),
            ],
        )
    }

    #[test]
    fn test_overflow_beside_fill_is_standard() {
        assert_eq!(classify(&tree(), &[1, 0, 1]), FillPlan::Standard);
    }

    #[test]
    fn test_overflow_inside_fill_container_moves_row() {
        assert_eq!(classify(&tree(), &[1, 1, 1]), FillPlan::AtomicMove(vec![1]));
    }

    #[test]
    fn test_fill_at_root_falls_back() {
        let root = Section::new(SectionKind::Section, vec![fill_image(), text("a"), text("b")]);
        assert_eq!(classify(&root, &[2]), FillPlan::Standard);
    }

    #[test]
    fn test_cut_at_keeps_ancestors_on_both_sides() {
        let (before, from) = cut_at(&tree(), &[1]);
        assert_eq!(before.leaf_count(), 1);
        assert_eq!(from.leaf_count(), 5);

        let (before, from) = cut_at(&tree(), &[1, 0, 1]);
        assert_eq!(before.leaf_count(), 2);
        assert_eq!(from.leaf_count(), 4);
        let Node::Section(row) = &from.children[0] else {
            panic!("expected row");
        };
        assert!(row.is_row());
        assert_eq!(row.children.len(), 2);
    }
}
