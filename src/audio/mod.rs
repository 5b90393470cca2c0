//! Audio output sink

pub mod output;
pub mod sink;

pub use output::CpalSink;
pub use sink::{PcmSink, StreamFormat};
