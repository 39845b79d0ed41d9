//! Discord command implementations organized by site section.

#![allow(clippy::too_long_first_doc_paragraph)]

/// AI agronomist chat commands
pub mod ask;

/// Treatment cost calculator command
pub mod calculate;

/// Price comparison command
pub mod compare;

/// Supplier contact form command
pub mod contact;

/// General utility commands
pub mod general;

/// Resource guide commands
pub mod guides;

// Export commands
pub use ask::*;
pub use calculate::*;
pub use compare::*;
pub use contact::*;
pub use general::*;
pub use guides::*;
