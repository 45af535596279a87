//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.
//! datetimes as RFC 3339 strings rather than BSON datetimes.

pub mod admin;
pub mod auth;
pub mod pagination;
pub mod question;
