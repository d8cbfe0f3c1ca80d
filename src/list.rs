//! Section list facade.
//!
//! [`SectionList`] owns the span tree root, validates and clamps caller
//! arguments, and exposes the query and editing surface. The contract is
//! sentinel-based rather than `Result`-based: out-of-range queries return
//! -1 (or -1.0), degenerate edits return -1 or 0 and leave the list
//! untouched, and indices/sizes are silently clamped into range. No caller
//! input can panic.

use crate::span::Sizes;
use crate::span::Span;

/// An ordered list of variable-sized sections, backed by a balanced span
/// tree.
///
/// Queries and edits run in O(log s) where s is the number of stored
/// spans: runs of equal-sized sections collapse into a single span, so a
/// million uniform rows cost one node.
#[derive(Clone, Debug, Default)]
pub struct SectionList {
    root: Option<Span>,
}

impl SectionList {
    /// Create an empty list.
    pub fn new() -> SectionList {
        return SectionList { root: None };
    }

    /// Create a list of `count` sections of `size` each.
    ///
    /// This is the usual starting state for a virtual-scrolling grid where
    /// every row begins at the default height; it costs a single span.
    pub fn uniform(count: u64, size: f64) -> SectionList {
        let mut list = SectionList::new();
        list.insert(0, count as i64, size);
        return list;
    }

    /// Total number of sections. O(1).
    pub fn count(&self) -> u64 {
        return self.root.as_ref().map_or(0, Span::count);
    }

    /// Total size of all sections. O(1).
    pub fn size(&self) -> f64 {
        return self.root.as_ref().map_or(0.0, Span::size);
    }

    /// Check whether the list holds no sections.
    pub fn is_empty(&self) -> bool {
        return self.root.is_none();
    }

    /// Number of spans backing the list (the `s` in O(log s)).
    pub fn span_count(&self) -> usize {
        return self.root.as_ref().map_or(0, Span::span_count);
    }

    /// Read-only access to the root span, for structural inspection.
    pub fn root(&self) -> Option<&Span> {
        return self.root.as_ref();
    }

    /// Remove all sections.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Iterate over per-section sizes in section order.
    pub fn sizes(&self) -> Sizes<'_> {
        return Sizes::new(self.root.as_ref());
    }

    /// Find the index of the section covering `offset`.
    ///
    /// Returns -1 when the list is empty, `offset < 0`, or
    /// `offset >= size()`.
    pub fn index_of(&self, offset: f64) -> i64 {
        match &self.root {
            Some(root) if offset >= 0.0 && offset < root.size() => root.index_of(offset) as i64,
            _ => -1,
        }
    }

    /// Find the offset at which section `index` begins.
    ///
    /// Returns -1.0 when `index` is outside `[0, count())`.
    pub fn offset_of(&self, index: i64) -> f64 {
        match &self.root {
            Some(root) if index >= 0 && (index as u64) < root.count() => {
                root.offset_of(index as u64)
            }
            _ => -1.0,
        }
    }

    /// Find the size of section `index`.
    ///
    /// Returns -1.0 when `index` is outside `[0, count())`.
    pub fn size_of(&self, index: i64) -> f64 {
        match &self.root {
            Some(root) if index >= 0 && (index as u64) < root.count() => {
                root.size_of(index as u64)
            }
            _ => -1.0,
        }
    }

    /// Insert `count` sections of `size` each, starting at `index`.
    ///
    /// `index` is clamped into `[0, count()]` and `size` to `>= 0`
    /// (NaN clamps to 0). Returns the clamped starting index, or -1
    /// without mutating when `count <= 0`.
    pub fn insert(&mut self, index: i64, count: i64, size: f64) -> i64 {
        if count <= 0 {
            return -1;
        }
        let size = if size > 0.0 { size } else { 0.0 };
        let index = index.clamp(0, self.count() as i64) as u64;
        self.root = Some(match self.root.take() {
            Some(root) => root.insert(index, count as u64, size),
            None => Span::run(count as u64, size),
        });
        return index as i64;
    }

    /// Remove up to `count` sections starting at `index`, restricted to
    /// the list's current bounds.
    ///
    /// Returns the number of sections actually removed; 0 (without
    /// mutating) when `count <= 0` or the range misses the list entirely.
    pub fn remove(&mut self, index: i64, count: i64) -> u64 {
        let (start, removed) = self.clip(index, count);
        if removed == 0 {
            return 0;
        }
        self.root = match self.root.take() {
            Some(root) => root.remove(start, removed),
            None => None,
        };
        return removed;
    }

    /// Resize up to `count` sections starting at `index` to `size` each.
    ///
    /// Defined as remove-then-insert: the in-range part of the requested
    /// range is removed, and the same number of sections is re-inserted at
    /// the same starting index with the new size. Returns the number of
    /// sections actually affected, with the same no-op rules as
    /// [`SectionList::remove`].
    pub fn resize(&mut self, index: i64, count: i64, size: f64) -> u64 {
        let (start, affected) = self.clip(index, count);
        if affected == 0 {
            return 0;
        }
        self.remove(start as i64, affected as i64);
        self.insert(start as i64, affected as i64, size);
        return affected;
    }

    /// Intersect the requested `[index, index + count)` range with the
    /// list's bounds. Returns `(start, len)` with `len == 0` for ranges
    /// that miss the list entirely.
    fn clip(&self, index: i64, count: i64) -> (u64, u64) {
        if count <= 0 {
            return (0, 0);
        }
        let total = self.count() as i64;
        let start = index.clamp(0, total);
        let end = index.saturating_add(count).clamp(0, total);
        return (start as u64, (end - start).max(0) as u64);
    }
}
