use std::rc::Rc;

use crate::cursor::{Cursor, SequenceCursor};

/// Bounds every element type flowing through a pipeline satisfies.
pub trait Element: Clone + 'static {}

impl<T: Clone + 'static> Element for T {}

/// A re-iterable sequence: each call to [`Sequence::open`] starts an
/// independent pass with its own cursor.
pub trait Sequence<T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>>;

    /// Exact element count, when the source knows it without iterating.
    fn exact_len(&self) -> Option<usize> {
        None
    }

    /// One-allocation copy of all elements, for sources that can provide it.
    fn copy_exact(&self) -> Option<Vec<T>> {
        None
    }

    fn iter(&self) -> Cursor<'static, T>
    where
        T: Clone,
    {
        Cursor::new(self.open())
    }
}

impl<T, S> Sequence<T> for Rc<S>
where
    S: Sequence<T> + ?Sized,
{
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        (**self).open()
    }

    fn exact_len(&self) -> Option<usize> {
        (**self).exact_len()
    }

    fn copy_exact(&self) -> Option<Vec<T>> {
        (**self).copy_exact()
    }
}
