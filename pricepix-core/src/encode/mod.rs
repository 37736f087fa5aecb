//! The four pure encoding stages.

pub mod color;
pub mod compose;
pub mod normalize;
pub mod signature;
