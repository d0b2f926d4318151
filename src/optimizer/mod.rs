//! Score-driven search built on the chain.

mod score;
mod short_bursts;

pub use score::{ScoreFunction, ScoreKind};
pub use short_bursts::{ShortBurstResult, ShortBursts};
