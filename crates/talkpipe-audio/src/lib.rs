pub mod frames;

pub use frames::{read_frame, FrameReader};
