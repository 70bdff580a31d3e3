//! webapp-mcp: MCP server exposing a web application project to AI assistants
//!
//! This library implements a stdio MCP server that lets an AI client inspect
//! a web application: its database schema, its route table, and its source
//! tree. The server is deliberately thin — it serves data, the AI does the
//! reasoning.
//!
//! # Architecture
//!
//! - **Resources**: read-only text content (`app://schema`, `app://routes`),
//!   produced on demand by injected providers
//! - **Tools**: `ls` and `read_file`, both confined to the project root by a
//!   path guard
//! - **Transport**: line-delimited JSON-RPC 2.0 over stdin/stdout; stderr is
//!   reserved for diagnostics
//!
//! Where the data comes from is the host's concern: the [`project::SchemaProvider`]
//! and [`project::RoutesProvider`] traits are the seams, and the shipped
//! implementations read conventional files under the project root.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — MCP protocol implementation
//! - [`project`] — Project introspection: path guard, providers, file tools

pub mod config;
pub mod error;
pub mod mcp;
pub mod project;
