//! Terminal reducers over any [`Sequence`].
//!
//! Every reducer validates its arguments before opening a cursor, and the
//! cursor is released on every exit path, early returns included. "No
//! element" is reported as `None`.

use crate::cursor::Cursor;
use crate::error::{Error, require};
use crate::sequence::{Element, Sequence};

/// First element accepted by `predicate`. Stops at the first match.
pub fn first_where<T, S, P>(source: Option<&S>, predicate: Option<P>) -> Result<Option<T>, Error>
where
    T: Element,
    S: Sequence<T> + ?Sized,
    P: Fn(&T) -> bool,
{
    let source = require(source, "source")?;
    let predicate = require(predicate, "predicate")?;
    let mut cursor = Cursor::new(source.open());
    Ok(cursor.find(|item| predicate(item)))
}

/// Last element accepted by `predicate`. Always scans to exhaustion.
pub fn last_where<T, S, P>(source: Option<&S>, predicate: Option<P>) -> Result<Option<T>, Error>
where
    T: Element,
    S: Sequence<T> + ?Sized,
    P: Fn(&T) -> bool,
{
    let source = require(source, "source")?;
    let predicate = require(predicate, "predicate")?;
    Ok(Cursor::new(source.open()).filter(|item| predicate(item)).last())
}

/// The only element accepted by `predicate`.
///
/// Scans to exhaustion. More than one match fails with
/// [`ErrorCode::Cardinality`](crate::ErrorCode::Cardinality).
pub fn single_where<T, S, P>(source: Option<&S>, predicate: Option<P>) -> Result<Option<T>, Error>
where
    T: Element,
    S: Sequence<T> + ?Sized,
    P: Fn(&T) -> bool,
{
    let source = require(source, "source")?;
    let predicate = require(predicate, "predicate")?;
    let mut found = None;
    let mut matches: usize = 0;
    for item in Cursor::new(source.open()) {
        if predicate(&item) {
            matches = matches.checked_add(1).ok_or_else(|| Error::overflow("match count exceeds usize"))?;
            found = Some(item);
        }
    }
    match matches {
        0 | 1 => Ok(found),
        n => Err(Error::cardinality(format!("expected at most one matching element, found {n}"))),
    }
}

/// Number of elements accepted by `predicate`.
pub fn count_where<T, S, P>(source: Option<&S>, predicate: Option<P>) -> Result<usize, Error>
where
    T: Element,
    S: Sequence<T> + ?Sized,
    P: Fn(&T) -> bool,
{
    let source = require(source, "source")?;
    let predicate = require(predicate, "predicate")?;
    let mut count: usize = 0;
    for item in Cursor::new(source.open()) {
        if predicate(&item) {
            count = count.checked_add(1).ok_or_else(|| Error::overflow("count exceeds usize"))?;
        }
    }
    Ok(count)
}
