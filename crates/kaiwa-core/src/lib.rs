//! Domain types and environment abstraction for the Kaiwa client.
//!
//! Everything here is shared vocabulary: the records exchanged with the
//! external auth/profile service, the profile-load error taxonomy, and the
//! [`Environment`] trait that lets state machines run against real or
//! virtual time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod env;
mod profile;
mod session;

pub use env::{Environment, TokioEnv};
pub use error::LoadError;
pub use profile::{Lang, Profile, UserId};
pub use session::Session;
