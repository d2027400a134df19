//! Inbound adapters.

pub mod web;
