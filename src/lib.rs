pub mod api;
pub mod config;
pub mod deductor;
pub mod detector;
pub mod error;
pub mod frame;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod processor;
pub mod report;
pub mod smoother;
pub mod text;
pub mod timecode;
pub mod util;
// cmd and reports are binary modules (see main.rs).

pub use deductor::MatchDeductor;
pub use error::{MatchForgeError, MfResult};
