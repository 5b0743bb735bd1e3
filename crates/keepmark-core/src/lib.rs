//! keepmark-core: pure text logic behind the keepmark previewer.
//!
//! This crate provides:
//! - `render_pipeline` - the per-keystroke pre-render pass (math auto-wrap,
//!   shielding of code/math, strong/italic rewriting, restoration)
//! - `on_newline` - list continuation on a newline keypress
//! - `TextStats` - word and character counts for the status line
//!
//! Nothing here touches a UI or the filesystem; every function takes text and
//! returns text (or an edit instruction for the caller to apply).

pub mod emphasis;
pub mod list;
pub mod math;
pub mod shield;
pub mod stats;
pub mod text;
pub mod transform;

pub use list::{EditResult, ListAction, ListLine, ListMarker, detect_list_line, list_action, on_newline};
pub use shield::{Shielded, shield};
pub use stats::TextStats;
pub use transform::{Pipeline, PipelineOptions, render_pipeline};
