// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `web_sys::Element` behind the driver's node port.

use fdg_driver::{BoundingBox, DomNode};
use web_sys::{DomRect, Element};

/// A live DOM element.
#[derive(Debug, Clone)]
pub struct ElementNode(pub Element);

impl DomNode for ElementNode {
    fn id(&self) -> Option<String> {
        let id = self.0.id();
        (!id.is_empty()).then_some(id)
    }

    fn bounding_box(&self) -> BoundingBox {
        let own = rect_to_box(&self.0.get_bounding_client_rect());
        match self.0.parent_element() {
            Some(parent) => relative_to(own, &rect_to_box(&parent.get_bounding_client_rect())),
            None => own,
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(Self)
    }
}

/// `child` re-expressed with `parent`'s top-left corner as origin.
pub(crate) fn relative_to(child: BoundingBox, parent: &BoundingBox) -> BoundingBox {
    BoundingBox::new(
        child.left - parent.left,
        child.top - parent.top,
        child.width,
        child.height,
    )
}

/// Client-space rectangle of a `getBoundingClientRect()` result.
pub fn rect_to_box(rect: &DomRect) -> BoundingBox {
    BoundingBox::new(rect.left(), rect.top(), rect.width(), rect.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_taken_from_the_parent_origin() {
        let parent = BoundingBox::new(40.0, 25.0, 800.0, 600.0);
        let child = BoundingBox::new(52.0, 43.0, 50.0, 20.0);
        assert_eq!(
            relative_to(child, &parent),
            BoundingBox::new(12.0, 18.0, 50.0, 20.0)
        );
    }
}
