// Fundamental types of the slashing engine
// Principle: Minimal, auditable, byte-exact

pub mod identity;
pub mod message;
pub mod primitives;
pub mod signature;

pub use identity::*;
pub use message::*;
pub use primitives::*;
pub use signature::*;
