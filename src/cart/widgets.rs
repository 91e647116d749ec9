//! Shopping Cart Widgets
//!
//! `add_to_cart` and `checkout`, each rendering its own UI resource and
//! sharing one [`CartStore`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    helpers::{cart_message, checkout_message, get_or_create_cart_id},
    models::{AddToCartInput, CartSnapshot, CheckoutInput},
    state::CartStore,
};
use crate::widget::{ClientContext, UserContext, Widget, WidgetDescriptor, WidgetError};

/// Name of the primary tool for adding items to a cart
pub const TOOL_NAME: &str = "add_to_cart";
/// Name of the checkout tool
pub const CHECKOUT_TOOL_NAME: &str = "checkout";
/// URI for the cart widget template
pub const WIDGET_TEMPLATE_URI: &str = "ui://widget/shopping-cart.html";
/// URI for the checkout widget template
pub const CHECKOUT_TEMPLATE_URI: &str = "ui://widget/checkout.html";
/// Scope a token needs to check a cart out
pub const CHECKOUT_SCOPE: &str = "cart:checkout";

fn cart_locales() -> Vec<String> {
    vec!["en".to_owned(), "fr".to_owned()]
}

fn to_structured(snapshot: CartSnapshot) -> Result<Value, WidgetError> {
    serde_json::to_value(snapshot).map_err(|e| WidgetError::execution(e.to_string()))
}

/// Adds items to a cart and shows its contents.
pub struct AddToCartWidget {
    store: Arc<CartStore>,
    html: String,
    locales: Vec<String>,
}

impl AddToCartWidget {
    pub fn new(store: Arc<CartStore>, html: String) -> Self {
        Self {
            store,
            html,
            locales: cart_locales(),
        }
    }
}

impl WidgetDescriptor for AddToCartWidget {
    fn identifier(&self) -> &str {
        TOOL_NAME
    }

    fn title(&self) -> &str {
        "Add items to cart"
    }

    fn description(&self) -> Option<&str> {
        Some("Adds the provided items to the active cart and returns its state.")
    }

    fn template_uri(&self) -> &str {
        WIDGET_TEMPLATE_URI
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string" },
                            "quantity": { "type": "integer", "default": 1 }
                        },
                        "additionalProperties": true
                    }
                },
                "cartId": { "type": "string" }
            },
            "required": ["items"],
            "additionalProperties": false
        })
    }

    fn html(&self) -> &str {
        &self.html
    }

    fn invoked(&self) -> &str {
        "Shopping cart ready"
    }

    fn auth_required(&self) -> Option<bool> {
        Some(false)
    }

    fn prefers_border(&self) -> bool {
        true
    }

    fn supported_locales(&self) -> &[String] {
        &self.locales
    }
}

#[async_trait]
impl Widget for AddToCartWidget {
    type Input = AddToCartInput;

    async fn execute(
        &self,
        input: AddToCartInput,
        client: &ClientContext,
        _user: &UserContext,
    ) -> Result<Value, WidgetError> {
        let cart_id = get_or_create_cart_id(input.cart_id);
        let items = self.store.add_items(&cart_id, input.items);

        to_structured(CartSnapshot {
            message: cart_message(client.locale(), &cart_id, items.len()),
            cart_id,
            items,
            checkout: false,
        })
    }
}

/// Checks a cart out, clearing it.
pub struct CheckoutWidget {
    store: Arc<CartStore>,
    html: String,
    locales: Vec<String>,
    scopes: Vec<String>,
}

impl CheckoutWidget {
    pub fn new(store: Arc<CartStore>, html: String) -> Self {
        Self {
            store,
            html,
            locales: cart_locales(),
            scopes: vec![CHECKOUT_SCOPE.to_owned()],
        }
    }
}

impl WidgetDescriptor for CheckoutWidget {
    fn identifier(&self) -> &str {
        CHECKOUT_TOOL_NAME
    }

    fn title(&self) -> &str {
        "Checkout"
    }

    fn description(&self) -> Option<&str> {
        Some("Checks out the current cart, clearing it and returning a receipt.")
    }

    fn template_uri(&self) -> &str {
        CHECKOUT_TEMPLATE_URI
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cartId": { "type": "string" }
            },
            "additionalProperties": false
        })
    }

    fn html(&self) -> &str {
        &self.html
    }

    fn invoked(&self) -> &str {
        "Checkout complete"
    }

    fn auth_required(&self) -> Option<bool> {
        Some(true)
    }

    fn auth_scopes(&self) -> &[String] {
        &self.scopes
    }

    fn supported_locales(&self) -> &[String] {
        &self.locales
    }
}

#[async_trait]
impl Widget for CheckoutWidget {
    type Input = CheckoutInput;

    async fn execute(
        &self,
        input: CheckoutInput,
        client: &ClientContext,
        user: &UserContext,
    ) -> Result<Value, WidgetError> {
        let cart_id = get_or_create_cart_id(input.cart_id);
        let items = self.store.checkout(&cart_id);
        let message = checkout_message(client.locale(), &items);
        tracing::info!(cart = %cart_id, subject = ?user.subject(), %message, "checkout");

        to_structured(CartSnapshot {
            cart_id,
            items: Vec::new(),
            message,
            checkout: true,
        })
    }
}
