//! Lazy, fused, re-iterable sequence pipelines.
//!
//! Sources come in three shapes ([`ArraySource`], [`ListSource`],
//! [`OpaqueSource`]). `filter` and `project` build a [`Stage`] specialised on
//! the source shape; chaining further operations fuses them into the same
//! stage. [`OrderedView`] adds multi-key stable sorting, and the functions in
//! [`reducers`] consume any [`Sequence`].
//!
//! ```
//! use lazyseq::{ArraySource, OrderedView, Pipeline, Sequence};
//!
//! let people = ArraySource::from(vec![("ann", 31), ("bob", 25), ("cid", 31)]);
//! let adults = people.clone().filter(|p| p.1 > 30).project(|p| p.0);
//! assert_eq!(adults.iter().collect::<Vec<_>>(), vec!["ann", "cid"]);
//!
//! let by_age = OrderedView::order_by(people, |p: &(&str, i32)| p.1);
//! assert_eq!(by_age.iter().map(|p| p.0).collect::<Vec<_>>(), vec!["bob", "ann", "cid"]);
//! ```

pub mod context;
pub mod cursor;
pub mod error;
pub mod materialize;
pub mod options;
pub mod ordered;
pub mod ordering;
pub mod pipeline;
pub mod reducers;
pub mod sequence;
pub mod sort;
pub mod source;
pub mod stage;

pub use context::ExecutionContext;
pub use cursor::{Cursor, IterCursor, SequenceCursor};
pub use error::{Error, ErrorCode};
pub use materialize::{Buffer, materialize};
pub use options::{PipelineOptions, PipelineOptionsBuilder};
pub use ordered::{OrderedCursor, OrderedView};
pub use ordering::{BoundChain, Direction, IndexComparer, KeyComparatorChain};
pub use pipeline::Pipeline;
pub use reducers::{count_where, first_where, last_where, single_where};
pub use sequence::{Element, Sequence};
pub use sort::sort_permutation;
pub use source::{ArraySource, ListSource, OpaqueSource, Shape, ShapeCursor, ShapeKind};
pub use stage::{Progress, Stage, StageCursor};
