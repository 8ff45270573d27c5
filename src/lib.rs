//! MCP server for editing Maven `pom.xml` files.
//!
//! Exposes `pom.*` tools for dependencies, managed dependencies, build
//! plugins, properties and profiles over JSON-RPC 2.0 stdio transport.
//! Edits preserve comments, formatting and every untouched element.

pub mod config;
pub mod handlers;
pub mod pom;
pub mod protocol;
pub mod server;

pub mod schema;
