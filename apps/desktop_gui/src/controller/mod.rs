//! Controller layer: UI events, user intents, and command orchestration.

pub mod events;
pub mod orchestration;
