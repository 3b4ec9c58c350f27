pub mod bot;
pub mod policy;

pub use bot::{BeliefView, BotParams, ParamsError};
pub use policy::{
    HeuristicPolicy, Policy, PolicyContext, PolicyFactory, PolicyRegistry, RandomPolicy,
    RegistryError,
};
