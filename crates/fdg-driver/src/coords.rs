// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Nested element coordinates → arena-relative coordinates.

use serde::{Deserialize, Serialize};

/// A measured box as reported by the host (`getBoundingClientRect` in browsers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Box at `(left, top)` with the given size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A node in the host's element tree.
///
/// Boxes are parent-relative, so summing them up an ancestor chain gives a
/// position relative to the top of the chain.
pub trait DomNode: Sized {
    /// Element identifier, if it has one.
    fn id(&self) -> Option<String>;
    /// Box with `left`/`top` measured from the parent's origin.
    fn bounding_box(&self) -> BoundingBox;
    /// Parent element; `None` at the root or for detached nodes.
    fn parent(&self) -> Option<Self>;
}

/// Outcome of [`CoordinateResolver::resolve_to_arena`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    /// The arena was reached; arena-relative point.
    Found {
        /// Horizontal offset from the arena's left edge (px).
        x: f64,
        /// Vertical offset from the arena's top edge (px).
        y: f64,
    },
    /// The ancestor chain ended without reaching the arena.
    NotFound,
}

impl Resolution {
    /// The resolved point, if any.
    pub fn point(self) -> Option<(f64, f64)> {
        match self {
            Self::Found { x, y } => Some((x, y)),
            Self::NotFound => None,
        }
    }
}

/// Walks ancestor chains up to the arena container.
#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    arena_id: String,
}

impl CoordinateResolver {
    /// Resolver stopping at the element whose id is `arena_id`.
    pub fn new(arena_id: impl Into<String>) -> Self {
        Self {
            arena_id: arena_id.into(),
        }
    }

    /// Translate `(x, y)`, local to `element`, into arena-relative space.
    ///
    /// Each non-arena node on the way up contributes its box offset. Detached
    /// or foreign elements yield [`Resolution::NotFound`], which callers skip.
    pub fn resolve_to_arena<N: DomNode>(&self, x: f64, y: f64, element: &N) -> Resolution {
        let (mut x, mut y) = (x, y);
        if self.visit(element, &mut x, &mut y) {
            return Resolution::Found { x, y };
        }
        let mut next = element.parent();
        while let Some(node) = next {
            if self.visit(&node, &mut x, &mut y) {
                return Resolution::Found { x, y };
            }
            next = node.parent();
        }
        Resolution::NotFound
    }

    /// True if `node` is the arena; otherwise adds its offset to the point.
    fn visit<N: DomNode>(&self, node: &N, x: &mut f64, y: &mut f64) -> bool {
        if node.id().as_deref() == Some(self.arena_id.as_str()) {
            return true;
        }
        let rect = node.bounding_box();
        *x += rect.left;
        *y += rect.top;
        false
    }
}
