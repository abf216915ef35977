//! Buffers a sequence into contiguous storage.

use tracing::trace;

use crate::cursor::Cursor;
use crate::options::PipelineOptions;
use crate::sequence::{Element, Sequence};

/// Elements of one pass over a sequence.
///
/// `len()` elements are live; `capacity()` may be larger when the buffer was
/// grown incrementally. [`Buffer::to_array`] never exposes the spare slots.
#[derive(Debug, Clone)]
pub struct Buffer<T> {
    items: Vec<T>,
}

impl<T: Element> Buffer<T> {
    pub fn from_sequence<S>(source: &S) -> Self
    where
        S: Sequence<T> + ?Sized,
    {
        Self::from_sequence_with(source, &PipelineOptions::default())
    }

    /// Bulk-copies when the source offers an exact copy, otherwise pulls
    /// element by element starting at `options.initial_capacity` and
    /// doubling whenever the buffer is full.
    pub fn from_sequence_with<S>(source: &S, options: &PipelineOptions) -> Self
    where
        S: Sequence<T> + ?Sized,
    {
        if let Some(items) = source.copy_exact() {
            trace!(count = items.len(), "materialized by bulk copy");
            return Self { items };
        }

        let mut items: Vec<T> = Vec::new();
        let mut grows = 0u32;
        for item in Cursor::new(source.open()) {
            if items.len() == items.capacity() {
                let additional = if items.capacity() == 0 { options.initial_capacity.max(1) } else { items.capacity() };
                items.reserve_exact(additional);
                grows += 1;
            }
            items.push(item);
        }
        trace!(count = items.len(), capacity = items.capacity(), grows, "materialized incrementally");
        Self { items }
    }
}

impl<T> Buffer<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Exactly `len()` elements; shrinks the allocation only if it has slack.
    pub fn to_array(self) -> Box<[T]> {
        self.items.into_boxed_slice()
    }
}

/// Shorthand for [`Buffer::from_sequence`] followed by [`Buffer::to_array`].
pub fn materialize<T, S>(source: &S) -> Box<[T]>
where
    T: Element,
    S: Sequence<T> + ?Sized,
{
    Buffer::from_sequence(source).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::source::{ArraySource, ListSource, OpaqueSource};
    use rstest::rstest;

    #[rstest]
    fn bulk_copy_is_exactly_sized() {
        let buffer = Buffer::from_sequence(&ArraySource::from(vec![1, 2, 3]));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(&*buffer.to_array(), &[1, 2, 3]);
    }

    #[rstest]
    fn list_is_bulk_copied() {
        let list = ListSource::from(vec!["x", "y"]);
        assert_eq!(Buffer::from_sequence(&list).as_slice(), &["x", "y"]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    #[case(37)]
    fn unknown_length_grows_and_trims(#[case] n: usize) {
        let source = OpaqueSource::from_iter_fn(move || 0..n);
        let buffer = Buffer::from_sequence(&source);
        assert_eq!(buffer.len(), n);
        assert!(buffer.capacity() >= n);
        let array = buffer.to_array();
        assert_eq!(array.len(), n);
        assert_eq!(array.iter().copied().collect::<Vec<_>>(), (0..n).collect::<Vec<_>>());
    }

    #[rstest]
    fn growth_doubles_from_initial_capacity() {
        let opts = PipelineOptions::builder().with_initial_capacity(2).build();
        let source = OpaqueSource::from_iter_fn(|| 0..5);
        let buffer = Buffer::from_sequence_with(&source, &opts);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.capacity(), 8);
    }

    #[rstest]
    fn stage_is_materialized_through_its_cursor() {
        let stage = ArraySource::from(vec![1, 2, 3, 4]).filter(|x| x % 2 == 1);
        assert_eq!(&*materialize(&stage), &[1, 3]);
    }
}
