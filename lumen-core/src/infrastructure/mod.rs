//! Infrastructure layer: seams to the unreliable external actors (the
//! signing extension, the anchor HTTP APIs, persistence, the system browser).

pub mod anchor;
pub mod config;
pub mod extension;
pub mod launcher;
pub mod logging;
pub mod store;
