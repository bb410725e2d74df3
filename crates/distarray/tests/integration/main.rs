//! Integration tests for distributed array layouts and per-rank files.
//!
//! These tests drive the public API end to end: layouts built from
//! configurations, chunks exported to `.dnpy` files on disk and read back
//! into fresh distributions.

mod file_roundtrip;
mod layouts;
