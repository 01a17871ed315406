pub mod coverage;
pub mod logger;
pub mod playback;

pub use coverage::*;
pub use logger::*;
pub use playback::{
    ConnectionError, PlaybackConnection, PlaybackMessage, PlaybackOutcome, PlaybackStreamer,
};
