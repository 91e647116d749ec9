//! MCP Apps Widget Server Library
//!
//! This library hosts UI-producing tools ("widgets") behind the MCP Apps
//! extension: handler dispatch, per-tool authorization, locale negotiation
//! and `ui://` resource shaping.

// Domain modules
pub mod auth;
pub mod cart;
pub mod mcp;
pub mod widget;

// Infrastructure
pub mod assets;
pub mod config;
pub mod router;
pub mod state;
pub mod telemetry;
