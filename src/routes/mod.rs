//! Router Module Index
//!
//! Splits routes by audience. Access control is not applied here: the router-wide
//! `access_guard` decides per request from the path alone, so a route is protected
//! exactly when it is mounted under the protected prefix.

/// Routes open to every visitor: blog data, health and the guard's landing targets.
pub mod public;

/// Routes mounted under the protected prefix. Handlers may rely on verified `Claims`.
pub mod admin;
