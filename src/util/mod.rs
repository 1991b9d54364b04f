//! Utility types and helpers for the actor system

pub mod ids;

pub use ids::{ActorId, ContextHandle, EventGroupId};
