//! foyer: a chat gateway between the browser UI and the agent backend.
//!
//! Terminates user sessions, gates page routes behind cookie-based
//! authentication, translates UI messages into the backend chat schema and
//! relays the backend's event stream to the browser unmodified.

pub mod api;
pub mod auth;
pub mod config;
pub mod message;
