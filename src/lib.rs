//! Spanlist - an ordered list of variable-sized sections for virtual
//! scrolling.
//!
//! Most rows in a big grid share one height while a minority vary. A
//! [`SectionList`] stores runs of equal-sized sections as single spans in a
//! self-balancing tree, so storage is proportional to the number of
//! distinct-size runs rather than the number of sections, and the two dual
//! lookups (index from offset, offset from index) stay exact and
//! logarithmic.
//!
//! # Quick Start
//!
//! ```
//! use spanlist::SectionList;
//!
//! // Five sections of size 10 each.
//! let mut list = SectionList::new();
//! list.insert(0, 5, 10.0);
//!
//! assert_eq!(list.count(), 5);
//! assert_eq!(list.size(), 50.0);
//! assert_eq!(list.offset_of(2), 20.0);
//! assert_eq!(list.index_of(25.0), 2);
//!
//! // Make section 2 taller, then scroll to it.
//! list.resize(2, 1, 30.0);
//! assert_eq!(list.offset_of(3), 50.0);
//! ```

pub mod list;
pub mod span;

pub use list::SectionList;
