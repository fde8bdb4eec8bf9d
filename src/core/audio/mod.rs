//! Raw audio plumbing: byte-stream framing and container encoding.

pub mod framing;
pub mod wav;

pub use framing::FrameAssembler;
pub use wav::{WAV_HEADER_LEN, encode_wav};
