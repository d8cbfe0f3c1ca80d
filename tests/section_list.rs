//! Integration tests for the section list facade.
//!
//! Covers the documented contract end to end: the worked insert/remove/
//! resize scenarios, sentinel returns at the bounds, and a seeded
//! model-based conformance run against a naive `Vec<f64>` of per-section
//! sizes.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spanlist::SectionList;
use spanlist::span::Span;

/// Recursively assert the structural invariants under `span`.
fn check_span(span: &Span) {
    match span {
        Span::Leaf { count, size } => {
            assert!(*count > 0, "leaf with zero count");
            assert!(*size >= 0.0, "leaf with negative size");
        }
        Span::Branch {
            count,
            size,
            level,
            left,
            right,
        } => {
            assert_eq!(*count, left.count() + right.count(), "stale branch count");
            assert_eq!(*size, left.size() + right.size(), "stale branch size");
            assert_eq!(
                *level,
                1 + left.level().max(right.level()),
                "stale branch level"
            );
            let balance = left.level() as i32 - right.level() as i32;
            assert!(balance.abs() <= 1, "balance factor {} out of range", balance);
            check_span(left);
            check_span(right);
        }
    }
}

fn check_invariants(list: &SectionList) {
    if let Some(root) = list.root() {
        check_span(root);
    } else {
        assert_eq!(list.count(), 0);
        assert_eq!(list.size(), 0.0);
    }
}

#[test]
fn scenario_uniform_insert() {
    let mut list = SectionList::new();
    assert_eq!(list.insert(0, 5, 10.0), 0);
    assert_eq!(list.count(), 5);
    assert_eq!(list.size(), 50.0);
    assert_eq!(list.offset_of(2), 20.0);
    assert_eq!(list.size_of(2), 10.0);
    assert_eq!(list.index_of(25.0), 2);
    check_invariants(&list);
}

#[test]
fn scenario_insert_taller_section_in_middle() {
    let mut list = SectionList::new();
    list.insert(0, 5, 10.0);
    assert_eq!(list.insert(2, 1, 20.0), 2);
    assert_eq!(list.count(), 6);
    assert_eq!(list.size(), 70.0);
    assert_eq!(list.offset_of(2), 20.0);
    assert_eq!(list.size_of(2), 20.0);
    assert_eq!(list.offset_of(3), 40.0);
    check_invariants(&list);
}

#[test]
fn scenario_remove_restores_uniform_state() {
    let mut list = SectionList::new();
    list.insert(0, 5, 10.0);
    list.insert(2, 1, 20.0);
    assert_eq!(list.remove(2, 1), 1);
    assert_eq!(list.count(), 5);
    assert_eq!(list.size(), 50.0);
    assert_eq!(list.offset_of(2), 20.0);
    assert_eq!(list.size_of(2), 10.0);
    assert_eq!(list.index_of(25.0), 2);
    check_invariants(&list);
}

#[test]
fn scenario_resize_shrinks_two_sections() {
    let mut list = SectionList::new();
    list.insert(0, 5, 10.0);
    assert_eq!(list.resize(1, 2, 5.0), 2);
    assert_eq!(list.count(), 5);
    assert_eq!(list.size(), 40.0);
    assert_eq!(list.size_of(1), 5.0);
    assert_eq!(list.size_of(2), 5.0);
    assert_eq!(list.size_of(3), 10.0);
    check_invariants(&list);
}

#[test]
fn idempotent_bounds() {
    let mut list = SectionList::new();
    list.insert(0, 5, 10.0);
    assert_eq!(list.index_of(-1.0), -1);
    assert_eq!(list.index_of(list.size()), -1);
    assert_eq!(list.offset_of(-1), -1.0);
    assert_eq!(list.offset_of(list.count() as i64), -1.0);
    assert_eq!(list.insert(2, 0, 5.0), -1);
    assert_eq!(list.remove(2, 0), 0);
    assert_eq!(list.count(), 5);
    assert_eq!(list.size(), 50.0);
}

#[test]
fn insert_then_remove_is_an_inverse() {
    let mut list = SectionList::new();
    list.insert(0, 4, 10.0);
    list.insert(2, 3, 7.5);
    let count = list.count();
    let size = list.size();

    let at = list.insert(3, 5, 2.5);
    assert_eq!(list.remove(at, 5), 5);
    assert_eq!(list.count(), count);
    assert_eq!(list.size(), size);
    check_invariants(&list);
}

#[test]
fn equal_size_appends_collapse_into_one_span() {
    let mut list = SectionList::new();
    for _ in 0..100 {
        list.insert(list.count() as i64, 1, 12.0);
    }
    assert_eq!(list.count(), 100);
    assert_eq!(list.span_count(), 1);
}

#[test]
fn partition_property_on_mixed_sizes() {
    let mut list = SectionList::new();
    list.insert(0, 8, 10.0);
    list.insert(3, 2, 25.0);
    list.insert(0, 1, 4.0);
    list.resize(6, 2, 0.5);

    let count = list.count() as i64;
    for i in 0..count - 1 {
        assert_eq!(
            list.offset_of(i) + list.size_of(i),
            list.offset_of(i + 1),
            "partition broke at section {}",
            i
        );
    }
    assert_eq!(
        list.offset_of(count - 1) + list.size_of(count - 1),
        list.size()
    );
}

#[test]
fn round_trip_property_on_mixed_sizes() {
    let mut list = SectionList::new();
    list.insert(0, 6, 10.0);
    list.insert(2, 2, 30.0);
    list.insert(8, 1, 0.5);

    for i in 0..list.count() as i64 {
        assert_eq!(list.index_of(list.offset_of(i)), i, "round trip broke at {}", i);
    }
}

#[test]
fn zero_size_sections_are_addressable_by_index() {
    let mut list = SectionList::new();
    list.insert(0, 3, 10.0);
    list.insert(1, 2, 0.0);
    assert_eq!(list.count(), 5);
    assert_eq!(list.size(), 30.0);
    assert_eq!(list.offset_of(1), 10.0);
    assert_eq!(list.offset_of(2), 10.0);
    assert_eq!(list.size_of(1), 0.0);
    // An offset query lands on the first section covering it, never on a
    // zero-size section.
    assert_eq!(list.index_of(10.0), 3);
}

/// Naive reference model: one f64 per section.
struct Model {
    sizes: Vec<f64>,
}

impl Model {
    fn new() -> Model {
        return Model { sizes: Vec::new() };
    }

    fn count(&self) -> u64 {
        return self.sizes.len() as u64;
    }

    fn size(&self) -> f64 {
        return self.sizes.iter().sum();
    }

    fn insert(&mut self, index: i64, count: i64, size: f64) {
        if count <= 0 {
            return;
        }
        let size = if size > 0.0 { size } else { 0.0 };
        let index = index.clamp(0, self.sizes.len() as i64) as usize;
        for _ in 0..count {
            self.sizes.insert(index, size);
        }
    }

    fn remove(&mut self, index: i64, count: i64) {
        if count <= 0 {
            return;
        }
        let total = self.sizes.len() as i64;
        let start = index.clamp(0, total);
        let end = index.saturating_add(count).clamp(0, total);
        self.sizes.drain(start as usize..end as usize);
    }

    fn resize(&mut self, index: i64, count: i64, size: f64) {
        if count <= 0 {
            return;
        }
        let total = self.sizes.len() as i64;
        let start = index.clamp(0, total);
        let end = index.saturating_add(count).clamp(0, total);
        let size = if size > 0.0 { size } else { 0.0 };
        for s in &mut self.sizes[start as usize..end as usize] {
            *s = size;
        }
    }

    fn offset_of(&self, index: i64) -> f64 {
        return self.sizes[..index as usize].iter().sum();
    }
}

/// Sizes drawn from a dyadic set so every sum and product in both the tree
/// and the model is exact in f64, making equality assertions legitimate.
const SIZES: [f64; 6] = [0.5, 1.0, 2.5, 4.0, 10.0, 20.0];

#[test]
fn conformance_against_naive_model() {
    let mut rng = StdRng::seed_from_u64(0x5ec710);
    let mut list = SectionList::new();
    let mut model = Model::new();

    for _ in 0..2000 {
        let total = model.count() as i64;
        match rng.gen_range(0..3) {
            0 => {
                let index = rng.gen_range(-2..=total + 2);
                let count = rng.gen_range(1..=8);
                let size = SIZES[rng.gen_range(0..SIZES.len())];
                list.insert(index, count, size);
                model.insert(index, count, size);
            }
            1 => {
                let index = rng.gen_range(-2..=total + 2);
                let count = rng.gen_range(1..=12);
                list.remove(index, count);
                model.remove(index, count);
            }
            _ => {
                let index = rng.gen_range(-2..=total + 2);
                let count = rng.gen_range(1..=6);
                let size = SIZES[rng.gen_range(0..SIZES.len())];
                list.resize(index, count, size);
                model.resize(index, count, size);
            }
        }

        check_invariants(&list);
        assert_eq!(list.count(), model.count());
        assert_eq!(list.size(), model.size());

        // Spot-check the per-section queries.
        if model.count() > 0 {
            let probe = rng.gen_range(0..model.count()) as i64;
            assert_eq!(list.size_of(probe), model.sizes[probe as usize]);
            assert_eq!(list.offset_of(probe), model.offset_of(probe));
        }
    }

    // Full sweep at the end: every section agrees.
    let collected: Vec<f64> = list.sizes().collect();
    assert_eq!(collected, model.sizes);
}

#[test]
fn conformance_index_of_against_naive_model() {
    let mut rng = StdRng::seed_from_u64(0xdeface);
    let mut list = SectionList::new();
    let mut model = Model::new();

    for _ in 0..300 {
        let total = model.count() as i64;
        let index = rng.gen_range(0..=total);
        let count = rng.gen_range(1..=4);
        let size = SIZES[rng.gen_range(0..SIZES.len())];
        list.insert(index, count, size);
        model.insert(index, count, size);
    }

    // For every section, offsets strictly inside it map back to it. Probe
    // the start of each nonzero section and a point just inside.
    let mut offset = 0.0;
    for (i, size) in model.sizes.iter().enumerate() {
        if *size > 0.0 {
            assert_eq!(list.index_of(offset), i as i64, "start of section {}", i);
            assert_eq!(
                list.index_of(offset + size / 2.0),
                i as i64,
                "middle of section {}",
                i
            );
        }
        offset += size;
    }
}
