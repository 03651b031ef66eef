//! Shared iteration capability contract for the library's containers.
//!
//! Every container cursor exposes the same surface: forward and backward
//! stepping, peeking at the current value, and repositioning to either end.
//! Mutation through the cursor (`remove`/`add`) is part of the contract but
//! optional; containers that cannot support it safely keep the defaults,
//! which report the operation as unsupported instead of acting.
//!
//! The B-tree cursor keeps both defaults: removing the current key while
//! ancestor frames describe a structural position that a removal-triggered
//! merge could invalidate is unsafe without re-deriving the whole frame
//! chain, so callers delete through the tree and re-seek instead.

/// Bidirectional, resumable traversal over a container's values.
///
/// `next` yields the value at the current position and advances past it;
/// `previous` steps back first and yields the value it lands on. A full
/// reverse enumeration is therefore [`current_value`](Iterate::current_value)
/// followed by `previous` to exhaustion.
pub trait Iterate {
    /// The value handed out at each position.
    type Item;

    /// True if a call to [`next`](Iterate::next) would yield a value.
    fn has_next(&self) -> bool;

    /// Yields the value at the current position and advances.
    fn next(&mut self) -> Option<Self::Item>;

    /// The value at the current position, without moving.
    fn current_value(&self) -> Option<Self::Item>;

    /// Repositions at the container's first value.
    fn first(&mut self);

    /// Repositions at the container's last value.
    fn last(&mut self);

    /// True if a call to [`previous`](Iterate::previous) would yield a value.
    fn has_previous(&self) -> bool;

    /// Steps back and yields the value at the new position.
    fn previous(&mut self) -> Option<Self::Item>;

    /// Removes the value at the current position.
    ///
    /// Returns `false` when the container does not support removal through
    /// its cursor. The default is unsupported.
    fn remove(&mut self) -> bool {
        false
    }

    /// Inserts a value at the current position.
    ///
    /// Returns `false` when the container does not support insertion through
    /// its cursor. The default is unsupported.
    fn add(&mut self, _value: Self::Item) -> bool {
        false
    }
}
