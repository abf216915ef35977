//! Pull-based cursor contract shared by every producer in the crate.

/// Produces the next element of a logical stream or signals exhaustion.
///
/// The protocol is `advance` then `current`: `current` is only meaningful
/// directly after `advance` returned `true`. Once `advance` has returned
/// `false` the cursor stays exhausted. `release` gives back any upstream
/// resource the cursor holds and must be safe to call any number of times.
pub trait SequenceCursor<T> {
    fn advance(&mut self) -> bool;

    fn current(&self) -> Option<&T>;

    fn release(&mut self);

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<T, C> SequenceCursor<T> for Box<C>
where
    C: SequenceCursor<T> + ?Sized,
{
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn current(&self) -> Option<&T> {
        (**self).current()
    }

    fn release(&mut self) {
        (**self).release();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

/// Scope guard that drives a boxed cursor as an [`Iterator`].
///
/// Dropping the guard releases the cursor, so leaving a `for` loop early
/// (`break`, `return`, `?`) still hands back the upstream resource.
pub struct Cursor<'a, T> {
    inner: Box<dyn SequenceCursor<T> + 'a>,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(inner: Box<dyn SequenceCursor<T> + 'a>) -> Self {
        Self { inner }
    }

    pub fn release(&mut self) {
        self.inner.release();
    }
}

impl<T: Clone> Iterator for Cursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.inner.advance() { self.inner.current().cloned() } else { None }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> Drop for Cursor<'_, T> {
    fn drop(&mut self) {
        self.inner.release();
    }
}

/// Adapts a plain [`Iterator`] to the cursor protocol.
pub struct IterCursor<I: Iterator> {
    iter: Option<I>,
    current: Option<I::Item>,
}

impl<I: Iterator> IterCursor<I> {
    pub fn new(iter: I) -> Self {
        Self { iter: Some(iter), current: None }
    }
}

impl<I: Iterator> SequenceCursor<I::Item> for IterCursor<I> {
    fn advance(&mut self) -> bool {
        match self.iter.as_mut().and_then(Iterator::next) {
            Some(item) => {
                self.current = Some(item);
                true
            }
            None => {
                self.release();
                false
            }
        }
    }

    fn current(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    fn release(&mut self) {
        self.iter = None;
        self.current = None;
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        remaining: u32,
        current: Option<u32>,
        releases: Rc<Cell<u32>>,
    }

    impl SequenceCursor<u32> for Counting {
        fn advance(&mut self) -> bool {
            if self.remaining == 0 {
                return false;
            }
            self.current = Some(self.remaining);
            self.remaining -= 1;
            true
        }

        fn current(&self) -> Option<&u32> {
            self.current.as_ref()
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
            self.remaining = 0;
            self.current = None;
        }
    }

    #[rstest]
    fn iter_cursor_follows_protocol() {
        let mut cursor = IterCursor::new(vec![1, 2].into_iter());
        assert!(cursor.current().is_none());
        assert!(cursor.advance());
        assert_eq!(cursor.current(), Some(&1));
        assert!(cursor.advance());
        assert_eq!(cursor.current(), Some(&2));
        assert!(!cursor.advance());
        assert!(cursor.current().is_none());
        assert!(!cursor.advance());
    }

    #[rstest]
    fn iter_cursor_release_is_idempotent() {
        let mut cursor = IterCursor::new(0..10);
        assert!(cursor.advance());
        cursor.release();
        cursor.release();
        assert!(!cursor.advance());
        assert!(cursor.current().is_none());
    }

    #[rstest]
    fn guard_releases_on_early_break() {
        let releases = Rc::new(Cell::new(0));
        let inner = Counting { remaining: 5, current: None, releases: Rc::clone(&releases) };
        let mut seen = Vec::new();
        for value in Cursor::new(Box::new(inner)) {
            seen.push(value);
            if seen.len() == 2 {
                break;
            }
        }
        assert_eq!(seen, vec![5, 4]);
        assert_eq!(releases.get(), 1);
    }
}
