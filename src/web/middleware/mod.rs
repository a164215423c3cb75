//! Request middleware for the web API.

pub mod identity;
