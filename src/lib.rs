//! Editor for linear programs solved by a remote tabular simplex service.
//!
//! The form lives in memory ([`domain::form::FormModel`]); pages are
//! projections of it. Submissions are validated, serialized, persisted and
//! sent to the solver; the last inputs and the last optimal result survive
//! restarts through [`store::SessionStore`].

pub mod config;
pub mod domain;
pub mod editor;
pub mod handlers;
pub mod page;
pub mod render;
pub mod store;
