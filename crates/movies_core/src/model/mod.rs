//! Domain model for the movie catalogue.
//!
//! # Responsibility
//! - Define the `Movie`, `Actor` and `Studio` records persisted by core.
//! - Provide in-memory linking helpers for the movie/actor and movie/studio
//!   relations.
//!
//! # Invariants
//! - Identity is the store-assigned id. Two entities are equal only when both
//!   ids are set and equal; an unsaved entity equals only itself.
//! - Hashing is constant, so hashes never depend on mutable fields.
//! - `Movie` is the owning side of both relations. `Studio::movies` is a
//!   pending write list on save and a derived read on load.

pub mod actor;
pub mod movie;
pub mod studio;

/// Store-assigned surrogate key shared by all entity tables.
pub type EntityId = i64;

/// Identity comparison shared by all entities.
///
/// Falls back to address identity while either side is unsaved.
pub(crate) fn same_identity<T>(
    left: &T,
    left_id: Option<EntityId>,
    right: &T,
    right_id: Option<EntityId>,
) -> bool {
    match (left_id, right_id) {
        (Some(left_id), Some(right_id)) => left_id == right_id,
        _ => std::ptr::eq(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::same_identity;

    #[test]
    fn same_identity_compares_ids_when_both_are_set() {
        let a = "left";
        let b = "right";
        assert!(same_identity(&a, Some(7), &b, Some(7)));
        assert!(!same_identity(&a, Some(7), &b, Some(8)));
    }

    #[test]
    fn same_identity_falls_back_to_address_for_unsaved_values() {
        let a = String::from("x");
        let b = String::from("x");
        assert!(same_identity(&a, None, &a, None));
        assert!(!same_identity(&a, None, &b, None));
        assert!(!same_identity(&a, Some(1), &b, None));
    }
}
