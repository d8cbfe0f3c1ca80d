//! AFL fuzz harness for the section list.
//!
//! Decodes a byte stream into insert/remove/resize operations and checks
//! the structural invariants after every single one:
//! 1. Balance: every branch's child levels differ by at most one, even
//!    after bulk removals (the rebalance loop's termination is exactly what
//!    this harness exercises).
//! 2. Aggregates: every branch's count/size/level match its children.
//! 3. No empty leaves, no negative sizes.
//! 4. The facade totals agree with a naive replay of the same operations.

use afl::fuzz;
use spanlist::SectionList;
use spanlist::span::Span;

/// Operation types the fuzzer can generate.
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert { pos_frac: u8, count: u8, size: u8 },
    Remove { pos_frac: u8, count: u8 },
    Resize { pos_frac: u8, count: u8, size: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 3;
        let rest = &bytes[1..];

        match op_type {
            0 if rest.len() >= 3 => {
                let op = FuzzOp::Insert {
                    pos_frac: rest[0],
                    count: (rest[1] % 16).saturating_add(1),
                    size: rest[2],
                };
                Some((op, &rest[3..]))
            }
            1 if rest.len() >= 2 => {
                let op = FuzzOp::Remove {
                    pos_frac: rest[0],
                    count: (rest[1] % 32).saturating_add(1),
                };
                Some((op, &rest[2..]))
            }
            2 if rest.len() >= 3 => {
                let op = FuzzOp::Resize {
                    pos_frac: rest[0],
                    count: (rest[1] % 16).saturating_add(1),
                    size: rest[2],
                };
                Some((op, &rest[3..]))
            }
            _ => None,
        }
    }
}

/// Map a byte to a size. Multiples of 0.25 keep all sums exact in f64, so
/// the aggregate checks below can use strict equality.
fn decode_size(byte: u8) -> f64 {
    return byte as f64 * 0.25;
}

/// Map a byte to an index near the current bounds, including slightly
/// outside them to exercise the clamping paths.
fn decode_pos(byte: u8, total: u64) -> i64 {
    return (byte as u64 * (total + 4) / 256) as i64 - 2;
}

/// Recursively check the structural invariants.
fn check(span: &Span) {
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
            assert_eq!(*count, left.count() + right.count(), "stale count");
            assert_eq!(*size, left.size() + right.size(), "stale size");
            assert_eq!(*level, 1 + left.level().max(right.level()), "stale level");
            let balance = left.level() as i32 - right.level() as i32;
            assert!(balance.abs() <= 1, "balance factor {} out of range", balance);
            check(left);
            check(right);
        }
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut list = SectionList::new();
        let mut model: Vec<f64> = Vec::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            let total = list.count();

            match op {
                FuzzOp::Insert { pos_frac, count, size } => {
                    let pos = decode_pos(pos_frac, total);
                    let size = decode_size(size);
                    let at = list.insert(pos, count as i64, size);
                    assert!(at >= 0, "positive-count insert rejected");

                    for _ in 0..count {
                        model.insert(at as usize, size);
                    }
                }

                FuzzOp::Remove { pos_frac, count } => {
                    let pos = decode_pos(pos_frac, total);
                    let removed = list.remove(pos, count as i64);

                    let start = pos.clamp(0, model.len() as i64) as usize;
                    let end = (pos + count as i64).clamp(0, model.len() as i64) as usize;
                    assert_eq!(removed, (end - start) as u64, "removed count mismatch");
                    model.drain(start..end);
                }

                FuzzOp::Resize { pos_frac, count, size } => {
                    let pos = decode_pos(pos_frac, total);
                    let size = decode_size(size);
                    let affected = list.resize(pos, count as i64, size);

                    let start = pos.clamp(0, model.len() as i64) as usize;
                    let end = (pos + count as i64).clamp(0, model.len() as i64) as usize;
                    assert_eq!(affected, (end - start) as u64, "affected count mismatch");
                    for s in &mut model[start..end] {
                        *s = size;
                    }
                }
            }

            // Structure must be intact after every operation.
            if let Some(root) = list.root() {
                check(root);
            }
            assert_eq!(list.count(), model.len() as u64, "count diverged");
            assert_eq!(list.size(), model.iter().sum::<f64>(), "size diverged");
        }

        // Full sweep: every per-section answer agrees with the model.
        let mut offset = 0.0;
        for (i, size) in model.iter().enumerate() {
            assert_eq!(list.size_of(i as i64), *size, "size_of({}) diverged", i);
            assert_eq!(list.offset_of(i as i64), offset, "offset_of({}) diverged", i);
            offset += size;
        }
    });
}
