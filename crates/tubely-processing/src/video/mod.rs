//! External media tools and classification.

pub mod orientation;
pub mod probe;
pub mod remux;
mod tool;

pub use orientation::{classify, ASPECT_LANDSCAPE, ASPECT_PORTRAIT};
pub use probe::{parse_probe_output, Dimensions, FfprobeProbe, VideoProbe};
pub use remux::{remux_output_path, FfmpegRemuxer, Remuxer};
