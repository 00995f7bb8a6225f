//! Session authentication.
//!
//! Route classification, the identity-provider adapter and the auth gate
//! middleware that ties them together.

pub mod classifier;
pub mod gate;
pub mod identity;

pub use classifier::{CALLBACK_PATH, LOGIN_PATH, RouteClass, classify, is_gate_exempt};
pub use gate::{GateDecision, auth_gate, decide};
pub use identity::{ACCESS_COOKIE, IdentityClient, REFRESH_COOKIE, ResolvedSession, User};
