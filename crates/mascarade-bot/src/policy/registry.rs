use super::{HeuristicPolicy, Policy, RandomPolicy};
use crate::bot::{BotParams, ParamsError};
use std::collections::BTreeMap;
use thiserror::Error;

pub type PolicyFactory = fn(BotParams) -> Box<dyn Policy>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("policy '{id}' is already registered")]
    Duplicate { id: String },
    #[error("unknown policy '{id}' (known: {known})")]
    Unknown { id: String, known: String },
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Maps policy ids used in tournament configs to constructors.
#[derive(Clone)]
pub struct PolicyRegistry {
    factories: BTreeMap<String, PolicyFactory>,
}

impl PolicyRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn with_builtin() -> Self {
        let mut factories: BTreeMap<String, PolicyFactory> = BTreeMap::new();
        factories.insert("heuristic".into(), spawn_heuristic);
        factories.insert("random".into(), spawn_random);
        Self { factories }
    }

    pub fn register(
        &mut self,
        id: impl Into<String>,
        factory: PolicyFactory,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        if self.factories.contains_key(&id) {
            return Err(RegistryError::Duplicate { id });
        }
        self.factories.insert(id, factory);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds a fresh policy; parameters are validated first.
    pub fn spawn(&self, id: &str, params: BotParams) -> Result<Box<dyn Policy>, RegistryError> {
        params.validate()?;
        let factory = self.factories.get(id).ok_or_else(|| RegistryError::Unknown {
            id: id.to_string(),
            known: self.ids().collect::<Vec<_>>().join(", "),
        })?;
        Ok(factory(params))
    }
}

fn spawn_heuristic(params: BotParams) -> Box<dyn Policy> {
    Box::new(HeuristicPolicy::new(params))
}

fn spawn_random(params: BotParams) -> Box<dyn Policy> {
    Box::new(RandomPolicy::new(params))
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
