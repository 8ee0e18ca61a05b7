//! Lotus ECS - actor handles and component storage
//!
//! Actors are addressed by generational [`Entity`] handles. A handle outlives
//! the actor it names: once the actor is despawned every lookup through the
//! old handle returns `None`, even after the slot has been reused.

mod component;
mod entity;
mod world;

pub use component::Component;
pub use entity::Entity;
pub use world::World;
