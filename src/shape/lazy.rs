//! Racy, idempotent lazy initialization for derived shape state.

use std::fmt;

use once_cell::race::OnceBox;

/// A write-once slot for state derived from an immutable shape: edge
/// trees, predicate grids, areas.
///
/// There is no lock. Threads that find the slot empty each compute the
/// value and race to publish it with a single compare-and-swap; the loser
/// drops its copy and reads the winner's. This is only sound because every
/// initializer stored here is a pure function of the shape's coordinates,
/// so all racing threads build the same value.
///
/// Memoized state takes no part in equality or in the identity of the
/// owning shape: two slots always compare equal, and cloning a slot copies
/// whatever has been computed so far.
pub struct LazySlot<T> {
    cell: OnceBox<T>,
}

impl<T> LazySlot<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceBox::new(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(|| Box::new(f()))
    }

    /// Like [`get_or_init`](Self::get_or_init), leaving the slot empty if
    /// the initializer fails.
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(|| f().map(Box::new))
    }
}

impl<T> Default for LazySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LazySlot<T> {
    fn clone(&self) -> Self {
        let slot = Self::new();
        if let Some(v) = self.get() {
            let _ = slot.cell.set(Box::new(v.clone()));
        }
        slot
    }
}

impl<T> PartialEq for LazySlot<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> fmt::Debug for LazySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.get().is_some() {
            "LazySlot(<computed>)"
        } else {
            "LazySlot(<empty>)"
        })
    }
}
