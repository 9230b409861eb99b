//! Ordering logic: catalog lookups, option picks, cart pricing, the per-tab
//! form, remote submission and the admin audit.

pub(crate) mod admin;
pub(crate) mod cart;
pub(crate) mod catalog;
pub(crate) mod error;
pub(crate) mod form;
pub(crate) mod selection;
pub(crate) mod submission;
