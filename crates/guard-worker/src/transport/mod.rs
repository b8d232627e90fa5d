//! Transport layer: `\n\n` framed JSON messages over byte streams.

mod framing;

pub use framing::{read_frame, write_frame};
