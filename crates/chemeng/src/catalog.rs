//! Relations looked up by name.

use std::collections::BTreeMap;

use crate::{
    error::ConfigurationError,
    relation::Relation,
    relations::{Bernoulli, BernoulliHead, TankDrain},
};

/// A set of relations keyed by [`Relation::name`].
#[derive(Default)]
pub struct Catalog {
    relations: BTreeMap<&'static str, Box<dyn Relation>>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of every built-in relation.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with(Bernoulli)
            .with(BernoulliHead)
            .with(TankDrain)
    }

    /// Adds a relation, replacing any with the same name.
    #[must_use]
    pub fn with(mut self, relation: impl Relation + 'static) -> Self {
        self.register(Box::new(relation));
        self
    }

    /// Adds a relation, returning the one it replaced.
    pub fn register(&mut self, relation: Box<dyn Relation>) -> Option<Box<dyn Relation>> {
        self.relations.insert(relation.name(), relation)
    }

    /// Looks up a relation by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownRelation`] if no relation has that
    /// name.
    pub fn get(&self, name: &str) -> Result<&dyn Relation, ConfigurationError> {
        self.relations
            .get(name)
            .map(|relation| &**relation as &dyn Relation)
            .ok_or_else(|| ConfigurationError::UnknownRelation {
                name: name.to_string(),
            })
    }

    /// Iterates over the relations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Relation> {
        self.relations
            .values()
            .map(|relation| &**relation as &dyn Relation)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
