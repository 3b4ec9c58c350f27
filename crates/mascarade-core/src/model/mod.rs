pub mod character;
pub mod deck;
pub mod lineup;
pub mod player;
pub mod registry;
