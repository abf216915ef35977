//! Logical execution context tokens.
//!
//! A stage remembers the context it was built in. Asking for a cursor from
//! that same context on a never-started stage lends out the stage itself;
//! any other request gets an independent clone.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static AMBIENT: ExecutionContext = ExecutionContext::new();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionContext {
    id: u64,
}

impl ExecutionContext {
    /// Allocates a context distinct from every other one in the process.
    pub fn new() -> Self {
        Self { id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed) }
    }

    /// The per-thread default context used by the builder functions and by
    /// `for` loops over `&mut Stage`.
    pub fn ambient() -> Self {
        AMBIENT.with(|ctx| *ctx)
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::ambient()
    }
}
