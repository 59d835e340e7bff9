pub mod energy;
pub mod gate;

pub use energy::rms;
pub use gate::{GateConfig, SilenceGate};
