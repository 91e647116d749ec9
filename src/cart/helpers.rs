//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations and formatting.

use super::models::CartItem;
use uuid::Uuid;

/// Returns the provided `cart_id` or creates a new UUID string when `None`.
///
/// This guarantees that every cart operation works with a non-empty identifier.
pub fn get_or_create_cart_id(cart_id: Option<String>) -> String {
    cart_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

/// Merges `new_items` into `cart_items`, aggregating quantities for existing
/// entries and inserting brand new ones.
///
/// Extra fields of an existing item are kept as they were; only the
/// quantity is updated.
pub fn update_cart_with_new_items(cart_items: &mut Vec<CartItem>, new_items: Vec<CartItem>) {
    for incoming in new_items {
        if let Some(existing) = cart_items.iter_mut().find(|i| i.name == incoming.name) {
            existing.quantity = existing.quantity.saturating_add(incoming.quantity);
        } else {
            cart_items.push(incoming);
        }
    }
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Apple, 1x Banana"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Status line for a cart, in French when the widget resolved to it.
pub fn cart_message(locale: Option<&str>, cart_id: &str, count: usize) -> String {
    if is_french(locale) {
        format!("Le panier {} contient {} article(s).", cart_id, count)
    } else {
        format!("Cart {} now has {} item(s).", cart_id, count)
    }
}

/// Status line for a checkout.
pub fn checkout_message(locale: Option<&str>, items: &[CartItem]) -> String {
    match (items.is_empty(), is_french(locale)) {
        (true, true) => "Le panier est vide.".to_owned(),
        (true, false) => "Cart is empty.".to_owned(),
        (false, true) => format!("Commande validée : {}", format_item_summary(items)),
        (false, false) => format!("Checked out now: {}", format_item_summary(items)),
    }
}

fn is_french(locale: Option<&str>) -> bool {
    locale.is_some_and(|l| l.to_ascii_lowercase().starts_with("fr"))
}
