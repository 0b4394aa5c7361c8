//! Log monitoring pipeline: tailing, classification, correlation

mod classifier;
mod correlator;
mod tailer;

pub use classifier::{LineClassifier, LineEvent, OutfitCodeTable};
pub use correlator::SessionCorrelator;
pub use tailer::LogTailer;
