//! # Cart Selection
//!
//! The set of catalog services currently selected for a quote.
//!
//! ## Two Views of One Cart
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input ids:  [misa-license, cr-registration, misa-license, gosi]        │
//! │                                                                         │
//! │  as a sequence (line items)      as a set (bundles, promo, upsell)      │
//! │  ─────────────────────────       ─────────────────────────────────      │
//! │  1. misa-license                 { misa-license, cr-registration,       │
//! │  2. cr-registration                gosi }                               │
//! │  3. gosi                                                                │
//! │                                                                         │
//! │  Duplicates collapse to their FIRST occurrence; order is preserved.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::MAX_CART_ITEMS;

/// Ordered, duplicate-free list of selected service ids.
///
/// ## Invariants
/// - Ids are unique (adding an id already present is a no-op)
/// - Insertion order is display order
/// - [`Cart::insert`] never grows past `MAX_CART_ITEMS` entries. `from_ids`
///   and deserialization keep every distinct id; [`Cart::check_size`] rejects
///   an oversized cart before it is priced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Cart {
    ids: Vec<String>,
    members: HashSet<String>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from ids in display order, dropping repeats.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cart = Cart::new();
        for id in ids {
            cart.push_unchecked(id.into());
        }
        cart
    }

    /// Adds a service id.
    ///
    /// ## Returns
    /// - `Ok(true)` if the id was added
    /// - `Ok(false)` if it was already selected
    /// - `Err(CartTooLarge)` if the cart is full
    pub fn insert(&mut self, id: impl Into<String>) -> CoreResult<bool> {
        let id = id.into();
        if self.members.contains(&id) {
            return Ok(false);
        }
        if self.ids.len() >= MAX_CART_ITEMS {
            return Err(too_large());
        }
        self.push_unchecked(id);
        Ok(true)
    }

    /// Fails with `CartTooLarge` if more than `MAX_CART_ITEMS` services are
    /// selected.
    pub fn check_size(&self) -> CoreResult<()> {
        if self.ids.len() > MAX_CART_ITEMS {
            return Err(too_large());
        }
        Ok(())
    }

    /// Removes a service id. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.ids.retain(|existing| existing != id);
        true
    }

    /// Clears all selections.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.members.clear();
    }

    /// Checks whether a service is selected.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Selected ids in display order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Selected ids as a slice, in display order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of distinct services.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks if nothing is selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Checks that every id in `required` is selected.
    pub fn contains_all<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        required.into_iter().all(|id| self.contains(id))
    }

    fn push_unchecked(&mut self, id: String) {
        if self.members.insert(id.clone()) {
            self.ids.push(id);
        }
    }
}

fn too_large() -> CoreError {
    CoreError::CartTooLarge {
        max: MAX_CART_ITEMS,
    }
}

impl From<Vec<String>> for Cart {
    fn from(ids: Vec<String>) -> Self {
        Cart::from_ids(ids)
    }
}

impl From<Cart> for Vec<String> {
    fn from(cart: Cart) -> Self {
        cart.ids
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
