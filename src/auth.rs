//! Auth-domain identifiers, redacted secrets, and secret-store payload models.

pub mod id;
pub mod record;
pub mod secret;

pub use id::*;
pub use record::*;
pub use secret::*;
