//! Widget Domain Module
//!
//! This module contains everything a widget needs to be hosted:
//! - The capability traits widgets implement (`Widget`, `WidgetDescriptor`)
//! - Execution contexts handed to `execute`
//! - The registry indexing widgets by identifier and template URI
//! - The server composition root holding registry and policy state

pub mod helpers;
pub mod models;
pub mod registry;
pub mod server;

// Re-export commonly used types for convenience
pub use models::{
    ClientContext, DynWidget, ParsedInput, SecurityScheme, UserContext, Widget, WidgetCsp,
    WidgetDescriptor, WidgetError,
};
pub use registry::{RegisteredWidget, RegistryError, WidgetRegistry};
pub use server::{ServerPolicy, WidgetServer};
