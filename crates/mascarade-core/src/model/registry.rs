//! Explicit registry of participant names, built once per tournament run.

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(usize);

impl PlayerId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    names: Vec<String>,
    by_name: HashMap<String, PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(GameError::DuplicatePlayer { name });
        }
        let id = PlayerId(self.names.len());
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Result<PlayerId, GameError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownPlayer {
                name: name.to_string(),
            })
    }

    pub fn name(&self, id: PlayerId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// Ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        (0..self.names.len()).map(PlayerId)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
