// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fake element tree.

use std::cell::RefCell;
use std::rc::Rc;

use fdg_driver::{BoundingBox, DomNode};

struct NodeData {
    id: Option<String>,
    rect: BoundingBox,
    parent: Option<usize>,
}

/// Arena-allocated element tree. Nodes are cheap handles into it.
///
/// # Example
///
/// ```
/// use fdg_dry_tests::FakeDom;
/// use fdg_driver::{BoundingBox, CoordinateResolver, Resolution};
///
/// let dom = FakeDom::new();
/// let arena = dom.root(Some("arena"), BoundingBox::default());
/// let child = dom.child(&arena, None, BoundingBox::new(4.0, 6.0, 10.0, 10.0));
/// let resolved = CoordinateResolver::new("arena").resolve_to_arena(1.0, 1.0, &child);
/// assert_eq!(resolved, Resolution::Found { x: 5.0, y: 7.0 });
/// ```
#[derive(Clone, Default)]
pub struct FakeDom {
    nodes: Rc<RefCell<Vec<NodeData>>>,
}

/// Handle to one node of a [`FakeDom`].
#[derive(Clone)]
pub struct FakeNode {
    dom: FakeDom,
    index: usize,
}

impl FakeDom {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parentless node.
    pub fn root(&self, id: Option<&str>, rect: BoundingBox) -> FakeNode {
        self.push(id, rect, None)
    }

    /// Add a node under `parent`.
    pub fn child(&self, parent: &FakeNode, id: Option<&str>, rect: BoundingBox) -> FakeNode {
        self.push(id, rect, Some(parent.index))
    }

    /// Detach `node` from its parent.
    pub fn detach(&self, node: &FakeNode) {
        self.nodes.borrow_mut()[node.index].parent = None;
    }

    fn push(&self, id: Option<&str>, rect: BoundingBox, parent: Option<usize>) -> FakeNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            id: id.map(str::to_owned),
            rect,
            parent,
        });
        FakeNode {
            dom: self.clone(),
            index: nodes.len() - 1,
        }
    }
}

impl DomNode for FakeNode {
    fn id(&self) -> Option<String> {
        self.dom.nodes.borrow()[self.index].id.clone()
    }

    fn bounding_box(&self) -> BoundingBox {
        self.dom.nodes.borrow()[self.index].rect
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.dom.nodes.borrow()[self.index].parent?;
        Some(Self {
            dom: self.dom.clone(),
            index: parent,
        })
    }
}
