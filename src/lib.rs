//! File-only static site server.
//!
//! Maps local directories to URL prefixes and serves regular files and
//! `index.html` index documents. Directory listings are never produced:
//! a directory without an index document is a 404, and every error
//! response can be customized per site root.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
