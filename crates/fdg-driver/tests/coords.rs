// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Ancestor-walk coordinate resolution.

use fdg_driver::{BoundingBox, CoordinateResolver, Resolution};
use fdg_dry_tests::FakeDom;

fn at(left: f64, top: f64) -> BoundingBox {
    BoundingBox::new(left, top, 50.0, 50.0)
}

#[test]
fn two_levels_deep_accumulates_both_offsets() {
    let dom = FakeDom::new();
    let arena = dom.root(Some("arena"), at(100.0, 100.0));
    let outer = dom.child(&arena, Some("card"), at(5.0, 5.0));
    let inner = dom.child(&outer, None, at(10.0, 10.0));

    let resolver = CoordinateResolver::new("arena");
    assert_eq!(
        resolver.resolve_to_arena(0.0, 0.0, &inner),
        Resolution::Found { x: 15.0, y: 15.0 }
    );
}

#[test]
fn arena_itself_resolves_to_input() {
    let dom = FakeDom::new();
    let arena = dom.root(Some("arena"), at(100.0, 100.0));
    let resolved = CoordinateResolver::new("arena").resolve_to_arena(3.0, 4.0, &arena);
    assert_eq!(resolved.point(), Some((3.0, 4.0)));
}

#[test]
fn foreign_chain_is_not_found() {
    let dom = FakeDom::new();
    let body = dom.root(Some("body"), at(0.0, 0.0));
    let sidebar = dom.child(&body, Some("sidebar"), at(1.0, 1.0));
    let resolved = CoordinateResolver::new("arena").resolve_to_arena(0.0, 0.0, &sidebar);
    assert_eq!(resolved, Resolution::NotFound);
}

#[test]
fn detached_element_is_not_found() {
    let dom = FakeDom::new();
    let arena = dom.root(Some("arena"), at(0.0, 0.0));
    let child = dom.child(&arena, None, at(2.0, 2.0));
    dom.detach(&child);
    assert_eq!(
        CoordinateResolver::new("arena").resolve_to_arena(0.0, 0.0, &child),
        Resolution::NotFound
    );
}

#[test]
fn id_match_is_exact() {
    let dom = FakeDom::new();
    let decoy = dom.root(Some("arena-2"), at(0.0, 0.0));
    let child = dom.child(&decoy, None, at(2.0, 2.0));
    assert_eq!(
        CoordinateResolver::new("arena").resolve_to_arena(0.0, 0.0, &child),
        Resolution::NotFound
    );
}
