mod belief;
mod params;

pub use belief::BeliefView;
pub use params::{BotParams, ParamsError};
