mod client;
pub mod contract;
mod session;
mod types;

pub use client::PredictionClient;
pub use session::{PredictionSession, PredictionState};
pub use types::*;
