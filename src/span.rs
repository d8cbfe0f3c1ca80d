//! Span tree: the node model behind [`SectionList`](crate::list::SectionList).
//!
//! A span is either a *leaf*, a run of equal-sized sections stored as a
//! single `(count, size)` pair, or a *branch* aggregating two child spans.
//! Runs of equal size collapse into one leaf, so the tree holds O(s) nodes
//! for s distinct-size runs no matter how many sections they cover, and
//! every query runs in O(log s).
//!
//! # Aggregate semantics
//!
//! - `count` = sections covered by this span
//! - `size` = total size of those sections (a leaf's per-section size is
//!   `size / count`)
//! - `level` = AVL height: 0 for a leaf, `1 + max(child levels)` for a branch
//!
//! Structural operations consume the old subtree by value and return its
//! replacement; branches are only ever built from two present children, so
//! unary branches cannot exist by construction.

/// A node in the section tree: a uniform run of sections, or the union of
/// two child spans.
#[derive(Clone, Debug)]
pub enum Span {
    /// A run of `count` sections totalling `size`, each `size / count` tall.
    Leaf {
        /// Number of sections in the run. Always > 0.
        count: u64,
        /// Total size of the run. Always >= 0.
        size: f64,
    },
    /// The ordered union of two child spans.
    Branch {
        /// Sections covered: `left.count + right.count`.
        count: u64,
        /// Total size: `left.size + right.size`.
        size: f64,
        /// AVL height: `1 + max(left.level, right.level)`.
        level: u32,
        left: Box<Span>,
        right: Box<Span>,
    },
}

impl Span {
    /// Build a leaf holding `count` sections of `size_each`.
    pub(crate) fn run(count: u64, size_each: f64) -> Span {
        debug_assert!(count > 0);
        Span::Leaf {
            count,
            size: size_each * count as f64,
        }
    }

    /// Build a branch from two children, computing aggregates.
    fn branch(left: Span, right: Span) -> Span {
        Span::Branch {
            count: left.count() + right.count(),
            size: left.size() + right.size(),
            level: 1 + left.level().max(right.level()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of sections this span covers.
    pub fn count(&self) -> u64 {
        match self {
            Span::Leaf { count, .. } => *count,
            Span::Branch { count, .. } => *count,
        }
    }

    /// Total size of the sections this span covers.
    pub fn size(&self) -> f64 {
        match self {
            Span::Leaf { size, .. } => *size,
            Span::Branch { size, .. } => *size,
        }
    }

    /// AVL height of this span.
    pub fn level(&self) -> u32 {
        match self {
            Span::Leaf { .. } => 0,
            Span::Branch { level, .. } => *level,
        }
    }

    /// Number of leaf spans in this subtree (the `s` in O(log s)).
    pub fn span_count(&self) -> usize {
        match self {
            Span::Leaf { .. } => 1,
            Span::Branch { left, right, .. } => left.span_count() + right.span_count(),
        }
    }

    /// Find the index of the section covering `offset`.
    ///
    /// Caller must ensure `0 <= offset < self.size()`.
    pub fn index_of(&self, mut offset: f64) -> u64 {
        debug_assert!(offset >= 0.0 && offset < self.size());
        let mut span = self;
        let mut index = 0;
        loop {
            match span {
                Span::Leaf { count, size } => {
                    // Sections in a leaf are uniform, so the position is
                    // apportioned by the ratio of local offset to leaf size.
                    // Clamp against float round-up at the leaf boundary.
                    let within = (offset * *count as f64 / size) as u64;
                    return index + within.min(count - 1);
                }
                Span::Branch { left, right, .. } => {
                    if offset < left.size() {
                        span = left;
                    } else {
                        offset -= left.size();
                        index += left.count();
                        span = right;
                    }
                }
            }
        }
    }

    /// Find the offset at which section `index` begins.
    ///
    /// Caller must ensure `index < self.count()`.
    pub fn offset_of(&self, mut index: u64) -> f64 {
        debug_assert!(index < self.count());
        let mut span = self;
        let mut offset = 0.0;
        loop {
            match span {
                Span::Leaf { count, size } => {
                    return offset + index as f64 * size / *count as f64;
                }
                Span::Branch { left, right, .. } => {
                    if index < left.count() {
                        span = left;
                    } else {
                        index -= left.count();
                        offset += left.size();
                        span = right;
                    }
                }
            }
        }
    }

    /// Find the size of section `index`.
    ///
    /// Caller must ensure `index < self.count()`.
    pub fn size_of(&self, mut index: u64) -> f64 {
        debug_assert!(index < self.count());
        let mut span = self;
        loop {
            match span {
                Span::Leaf { count, size } => return size / *count as f64,
                Span::Branch { left, right, .. } => {
                    if index < left.count() {
                        span = left;
                    } else {
                        index -= left.count();
                        span = right;
                    }
                }
            }
        }
    }

    /// Insert `count` sections of `size_each` before section `index`,
    /// returning the replacement subtree.
    ///
    /// Caller must ensure `count > 0` and `index <= self.count()`.
    pub(crate) fn insert(self, index: u64, count: u64, size_each: f64) -> Span {
        debug_assert!(count > 0 && index <= self.count());
        match self {
            Span::Leaf { count: have, size } => {
                let per = size / have as f64;
                if size_each == per {
                    // Same per-section size: extend the run in place.
                    Span::Leaf {
                        count: have + count,
                        size: size + size_each * count as f64,
                    }
                } else if index == 0 {
                    Span::branch(Span::run(count, size_each), Span::Leaf { count: have, size })
                } else if index >= have {
                    Span::branch(Span::Leaf { count: have, size }, Span::run(count, size_each))
                } else {
                    // Split the run around the insertion point. Both halves
                    // keep the original per-section size; the three leaves
                    // are assembled directly to keep the tree shallow.
                    let before = Span::run(index, per);
                    let after = Span::run(have - index, per);
                    Span::branch(Span::branch(before, Span::run(count, size_each)), after)
                }
            }
            Span::Branch { left, right, .. } => {
                let split = left.count();
                let joined = if index < split {
                    Span::branch((*left).insert(index, count, size_each), *right)
                } else {
                    Span::branch(*left, (*right).insert(index - split, count, size_each))
                };
                joined.rebalance()
            }
        }
    }

    /// Remove `count` sections starting at `index`, returning the
    /// replacement subtree, or `None` when the removal covers this whole
    /// span.
    ///
    /// Caller must ensure `count > 0` and `index + count <= self.count()`.
    pub(crate) fn remove(self, index: u64, count: u64) -> Option<Span> {
        debug_assert!(count > 0 && index + count <= self.count());
        if index == 0 && count == self.count() {
            return None;
        }
        match self {
            Span::Leaf { count: have, size } => {
                // Strict subset of the run: shrink it, preserving the
                // uniform per-section size.
                let per = size / have as f64;
                let rest = have - count;
                Some(Span::Leaf {
                    count: rest,
                    size: per * rest as f64,
                })
            }
            Span::Branch { left, right, .. } => {
                let split = left.count();
                let (left, right) = if index < split {
                    let from_left = count.min(split - index);
                    let left = (*left).remove(index, from_left);
                    let right = if count > from_left {
                        (*right).remove(0, count - from_left)
                    } else {
                        Some(*right)
                    };
                    (left, right)
                } else {
                    (Some(*left), (*right).remove(index - split, count))
                };
                match (left, right) {
                    (Some(left), Some(right)) => Some(Span::branch(left, right).rebalance()),
                    // One side fully removed: hoist the survivor so no
                    // unary branch persists.
                    (survivor, None) | (None, survivor) => survivor,
                }
            }
        }
    }

    /// Restore the AVL balance invariant at this span.
    ///
    /// A bulk remove can leave the two (internally balanced) children more
    /// than one rotation apart, so this loops: each rotation rebalances the
    /// subtrees it recombines, and the loop repeats until the heights agree
    /// within one. Aggregates are recomputed by construction on every
    /// rebuilt branch.
    fn rebalance(mut self) -> Span {
        loop {
            let balance = match &self {
                Span::Leaf { .. } => return self,
                Span::Branch { left, right, .. } => left.level() as i32 - right.level() as i32,
            };
            if balance > 1 {
                self = self.rotate_right();
            } else if balance < -1 {
                self = self.rotate_left();
            } else {
                return self;
            }
        }
    }

    /// One left-heavy rotation step: Left-Left single or Left-Right double.
    fn rotate_right(self) -> Span {
        let Span::Branch { left, right, .. } = self else {
            unreachable!("rotation on a leaf")
        };
        let Span::Branch {
            left: ll,
            right: lr,
            ..
        } = *left
        else {
            unreachable!("left-heavy span with leaf left child")
        };
        if ll.level() >= lr.level() {
            // Left-Left: hoist the left-left subtree; the former left-right
            // subtree joins the original right.
            Span::branch(*ll, Span::branch(*lr, *right).rebalance())
        } else {
            // Left-Right: the left-right subtree is split across both sides.
            let Span::Branch {
                left: lrl,
                right: lrr,
                ..
            } = *lr
            else {
                unreachable!("left-right-heavy span with leaf left-right child")
            };
            Span::branch(
                Span::branch(*ll, *lrl).rebalance(),
                Span::branch(*lrr, *right).rebalance(),
            )
        }
    }

    /// One right-heavy rotation step: Right-Right single or Right-Left
    /// double. Mirror of [`Span::rotate_right`].
    fn rotate_left(self) -> Span {
        let Span::Branch { left, right, .. } = self else {
            unreachable!("rotation on a leaf")
        };
        let Span::Branch {
            left: rl,
            right: rr,
            ..
        } = *right
        else {
            unreachable!("right-heavy span with leaf right child")
        };
        if rr.level() >= rl.level() {
            Span::branch(Span::branch(*left, *rl).rebalance(), *rr)
        } else {
            let Span::Branch {
                left: rll,
                right: rlr,
                ..
            } = *rl
            else {
                unreachable!("right-left-heavy span with leaf right-left child")
            };
            Span::branch(
                Span::branch(*left, *rll).rebalance(),
                Span::branch(*rlr, *rr).rebalance(),
            )
        }
    }
}

/// Iterator over per-section sizes, in section order.
///
/// Created by [`SectionList::sizes`](crate::list::SectionList::sizes).
pub struct Sizes<'a> {
    stack: Vec<&'a Span>,
    run: Option<(u64, f64)>,
}

impl<'a> Sizes<'a> {
    pub(crate) fn new(root: Option<&'a Span>) -> Sizes<'a> {
        Sizes {
            stack: root.into_iter().collect(),
            run: None,
        }
    }
}

impl<'a> Iterator for Sizes<'a> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            if let Some((remaining, per)) = &mut self.run {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Some(*per);
                }
                self.run = None;
            }
            match self.stack.pop()? {
                Span::Leaf { count, size } => {
                    self.run = Some((*count, size / *count as f64));
                }
                Span::Branch { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
    }
}
