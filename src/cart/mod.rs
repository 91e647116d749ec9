//! Shopping Cart Domain Module
//!
//! A pair of demonstration widgets served by the binary:
//! - Domain models (CartItem, inputs, structured snapshots)
//! - Business logic helpers (cart operations, formatting)
//! - In-memory cart storage
//! - The `add_to_cart` and `checkout` widgets

pub mod helpers;
pub mod models;
pub mod state;
pub mod widgets;

use std::sync::Arc;

use crate::{
    assets::AssetsDir,
    widget::{RegistryError, WidgetRegistry},
};

// Re-export commonly used types for convenience
pub use state::CartStore;
pub use widgets::{AddToCartWidget, CheckoutWidget};

/// Loads the cart widgets' markup and registers both widgets.
pub async fn register_cart_widgets(
    registry: &WidgetRegistry,
    store: Arc<CartStore>,
    assets: &AssetsDir,
) -> Result<(), RegistryError> {
    let cart_html = assets.load_widget_markup("shopping-cart").await;
    let checkout_html = assets.load_widget_markup("checkout").await;

    registry.register(Arc::new(AddToCartWidget::new(Arc::clone(&store), cart_html)))?;
    registry.register(Arc::new(CheckoutWidget::new(store, checkout_html)))?;
    Ok(())
}
