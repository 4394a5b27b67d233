//! Vibe Studio Project Model
//!
//! Defines the core data contracts for Vibe Studio projects:
//! - **Project:** target duration, category, media timeline, audio tracks
//! - **Category:** colour grades and audio vibes
//! - **Store:** the injected project registry and its generation guard

pub mod category;
pub mod project;
pub mod store;

pub use category::*;
pub use project::*;
pub use store::*;
