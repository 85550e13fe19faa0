//! Value objects for the claim domain.

pub mod contact;

pub use contact::{Contact, ContactMethod};
