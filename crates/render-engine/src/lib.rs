//! Vibe Studio Render Engine
//!
//! Turns a project's ordered media and audio tracks into one vertical
//! short-form video by driving an external ffmpeg binary.
//!
//! # Pipeline Architecture
//!
//! ```text
//! image.jpg ──► blur bg + contained fg + zoom ──┐
//!                                               ├── seg_000.mp4 ─┐
//! clip.mp4 ───► trim + cover scale + crop ──────┘   seg_001.mp4  │
//!                                                   ...          ▼
//!                                                   Concat (silent H.264)
//!                                                                │
//! tracks ─────────────┐                                          ▼
//!                     ├── loop + volume ─── amix ──────► Mux (-t target)
//! clip audio (opt.) ──┘                                          │
//!                                                                ▼
//!                                                   vibe_<id>_<ts>.mp4
//! ```
//!
//! Every stage builds an argument vector and hands it to a
//! [`runner::CommandRunner`]; tests replace the runner with a scripted one.

pub mod concat;
pub mod filter;
pub mod job;
pub mod mixer;
pub mod pipeline;
pub mod runner;
pub mod segment;
pub mod service;
pub mod timing;
pub mod trim;

pub use mixer::{AudioOutcome, AudioSource};
pub use pipeline::{GenerationOutput, GenerationRequest, RenderPipeline};
pub use runner::{CommandRunner, FfmpegRunner, RunError};
pub use service::GenerationService;
pub use trim::trim_clip;
