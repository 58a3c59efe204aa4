//! Types library for the signed-redemption vault
//!
//! Value types shared by the contract layer and by off-chain tooling. Every
//! type here is serializable and has a stable textual form, because several of
//! them end up inside signed messages.
//!
//! # Modules
//! - `ids`: Identities (`Address`) and one-time redemption codes
//! - `numeric`: Token amounts in integer base units
//! - `errors`: Parse error taxonomy

pub mod ids;
pub mod numeric;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::errors::*;
}
