//! Prompt Registry - lockfile-backed bundle tracking
//!
//! Installs bundles of prompts, instructions and MCP server definitions into
//! a git repository and tracks them in a pair of lockfiles sharing one
//! schema:
//!
//! - `prompt-registry.lock.json` - commit-mode bundles, meant to be
//!   version-controlled
//! - `prompt-registry.local.lock.json` - local-only bundles, hidden from
//!   version control through `.git/info/exclude`
//!
//! The [`store::LockfileStore`] is the system of record: which document a
//! bundle's entry lives in is the sole indicator of its commit mode, writes
//! are atomic, mutations serialize, and a filesystem watcher re-fires change
//! events for external edits.

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod git;
pub mod hash;
pub mod installer;
pub mod mcp;
pub mod store;
pub mod temp;
