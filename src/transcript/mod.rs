//! Transcript module for recap
//!
//! Parses WebVTT captions and splits them into token-bounded chunks.

mod normalize;
mod splitter;
pub mod vtt;

pub use normalize::normalize_caption;
pub use splitter::{join_chunks, split_cues, TokenCounter, CHUNK_SEPARATOR};
pub use vtt::{Cue, VttError};
