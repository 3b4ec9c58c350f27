pub mod action;
pub mod economy;
mod error;
pub mod history;
pub mod serialization;
pub mod state;

pub use error::GameError;
