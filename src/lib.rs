//! xhs-mcp: MCP server for reading and commenting on Xiaohongshu notes.
//!
//! The platform's API returns deeply nested, inconsistently populated JSON.
//! This crate turns those payloads into stable text reports an LLM can read:
//! - Locator parsing from share URLs or raw id+token strings
//! - Typed payload decoding with per-item skipping of malformed entries
//! - Deterministic text renderers per tool
//! - Session liveness fallback to tell "no results" from "cookie expired"
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              MCP Server (rmcp)              │
//! │         JSON-RPC over stdin/stdout          │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │               Tool Router                    │
//! │  check_cookie, home_feed, search_notes ...  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │            Tool Pipelines                    │
//! │   call → decode → render | probe fallback   │
//! └───────┬─────────┬─────────┬─────────────────┘
//!         │         │         │
//!    ┌────▼───┐ ┌───▼───┐ ┌───▼────┐
//!    │Locator │ │ Model │ │  Fmt   │
//!    │ parse  │ │decode │ │ render │
//!    └────────┘ └───┬───┘ └────────┘
//!                   │
//!    ┌──────────────▼──────────────┐
//!    │   XhsApi (reqwest client)   │
//!    │   cookie-bound, injected    │
//!    └─────────────────────────────┘
//! ```

pub mod api;
pub mod error;
pub mod fmt;
pub mod locator;
pub mod model;
pub mod server;
pub mod session;
pub mod tools;
pub mod types;

pub use error::{ApiError, LocatorError, Result, ServerError};
pub use locator::NoteLocator;
pub use session::SessionStatus;
pub use types::{Count, NoteKind, Timestamp};
