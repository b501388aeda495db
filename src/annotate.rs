//! Saved-state annotation for displayed lists.
//!
//! `isSaved` is never trusted from a response; it is recomputed from
//! collection membership every time a list is shown.

use std::collections::HashSet;

use crate::catalog::model::CatalogItem;

/// O(1) membership lookup by identifier.
pub trait Membership {
    fn is_member(&self, id: &str) -> bool;
}

impl Membership for HashSet<String> {
    fn is_member(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Copy `items`, setting `is_saved` from `membership`.
pub fn annotate<M: Membership + ?Sized>(items: &[CatalogItem], membership: &M) -> Vec<CatalogItem> {
    items
        .iter()
        .map(|item| CatalogItem {
            is_saved: membership.is_member(&item.id),
            ..item.clone()
        })
        .collect()
}
