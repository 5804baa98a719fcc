//! Note query resolution.
//!
//! # Responsibility
//! - Turn raw `category` / `search` request parameters into a typed query.
//! - Resolve an owner's notes through category narrowing, then search
//!   narrowing.

pub mod filter;
