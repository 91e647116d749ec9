//! Server Configuration
//!
//! Command-line flags with environment fallbacks, parsed once at startup.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};

use crate::widget::ServerPolicy;

/// Output format of log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// A `TOKEN=scope1,scope2` pair for the static token verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub scopes: Vec<String>,
}

/// Errors raised while parsing configuration values.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("token grant must look like TOKEN=scope1,scope2, got {0:?}")]
    MalformedGrant(String),
}

fn parse_token_grant(raw: &str) -> Result<TokenGrant, ConfigError> {
    let (token, scopes) = raw.split_once('=').unwrap_or((raw, ""));
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::MalformedGrant(raw.to_owned()));
    }
    Ok(TokenGrant {
        token: token.to_owned(),
        scopes: split_scopes(scopes),
    })
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Host MCP Apps widgets over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "mcp-apps-rust", version, about)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "MCP_APPS_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "MCP_APPS_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory containing built widget HTML; located automatically when omitted.
    #[arg(long, env = "MCP_APPS_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Require authentication for widgets that do not decide for themselves.
    #[arg(long, env = "MCP_APPS_REQUIRE_AUTH")]
    pub require_auth: bool,

    /// Default OAuth scopes advertised on tools when auth is required.
    #[arg(
        long = "auth-scope",
        env = "MCP_APPS_AUTH_SCOPES",
        value_delimiter = ','
    )]
    pub auth_scopes: Vec<String>,

    /// Accepted bearer tokens as TOKEN=scope1,scope2 (repeatable).
    #[arg(long = "token", value_parser = parse_token_grant)]
    pub tokens: Vec<TokenGrant>,

    /// Do not advertise the MCP Apps UI extension on initialize.
    #[arg(long)]
    pub no_ui_extension: bool,

    /// Log filter directive, e.g. `info` or `mcp_apps_rust=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, value_enum, env = "MCP_APPS_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn policy(&self) -> ServerPolicy {
        ServerPolicy {
            requires_auth: self.require_auth,
            auth_scopes: self.auth_scopes.clone(),
        }
    }

    /// Token table for the static verifier.
    pub fn token_table(&self) -> HashMap<String, Vec<String>> {
        self.tokens
            .iter()
            .map(|grant| (grant.token.clone(), grant.scopes.clone()))
            .collect()
    }

    pub fn advertise_ui_extension(&self) -> bool {
        !self.no_ui_extension
    }
}
