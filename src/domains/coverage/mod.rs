pub mod fingerprint;
pub mod generator;
pub mod ports;
pub mod types;

pub use fingerprint::PlanFingerprint;
pub use generator::{generate, generate_at};
pub use ports::*;
pub use types::*;
