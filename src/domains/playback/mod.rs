pub mod messages;
pub mod ports;
pub mod streamer;

pub use messages::*;
pub use ports::*;
pub use streamer::*;
