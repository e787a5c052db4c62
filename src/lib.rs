#![deny(missing_docs)]

//! Core library for the site MCP server.

/// HTTP routing for the MCP endpoint.
pub mod api;
/// Access-token authentication middleware.
pub mod auth;
/// Environment-driven configuration management.
pub mod config;
/// Content store abstraction and the in-memory backend.
pub mod content;
/// Access token and search backend credentials.
pub mod credentials;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol dispatcher, tool catalog, and handlers.
pub mod mcp;
/// Search backend GraphQL client.
pub mod search;
