//! Vendor-specific processor families.
//!
//! Each vendor module supplies the concrete [`crate::engine::CommandProcessor`]
//! implementations for its modes, the prompt/banner/error text, the
//! running-config renderer, and a [`crate::core::SwitchCore`] that
//! assembles the stack for new sessions.

pub mod arista;
pub mod brocade;
pub mod cisco;
pub mod dell;
pub mod hp;
pub mod juniper;
