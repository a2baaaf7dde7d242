//! Entity trait: identity + continuity across state changes.
//!
//! Every record the store owns (products, parties, orders) carries a typed
//! identifier; identity uniqueness is the one invariant they all share.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether two values denote the same entity, regardless of field state.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
