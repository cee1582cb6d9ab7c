use crate::core::token_id::TokenId;
use serde::Serialize;

/// A collection discovered from its mint history.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionDescriptor {
    name: String,
    token_ids: Vec<TokenId>,
    total_supply: usize,
}

impl CollectionDescriptor {
    /// `token_ids` must be in mint (emission) order.
    pub fn new(name: impl Into<String>, token_ids: Vec<TokenId>) -> Self {
        let total_supply = token_ids.len();
        CollectionDescriptor {
            name: name.into(),
            token_ids,
            total_supply,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token_ids(&self) -> &[TokenId] {
        &self.token_ids
    }

    pub fn total_supply(&self) -> usize {
        self.total_supply
    }

    /// Tokens with an id of at least `offset`, in mint order.
    pub fn tokens_from(&self, offset: TokenId) -> Vec<TokenId> {
        self.token_ids
            .iter()
            .filter(|id| **id >= offset)
            .copied()
            .collect()
    }
}
