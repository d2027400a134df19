//! Browser UI over the completion pipeline.
//!
//! `GET /` serves the form, `POST /generate` runs the pipeline and re-renders
//! the page with the inputs kept and the output shown below them.
//! `POST /api/generate` is the same operation with JSON in and out.

pub mod handlers;
pub mod server;
pub mod views;

pub use server::{AppState, WebServer};
pub use views::{PageRenderer, PageView};
