use crate::catalog::{Catalog, Category, VerseReference};
use crate::error::{AyahError, Result};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Source of uniform random indices. Swapped for a fixed source in tests.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`; callers never pass `len == 0`.
    fn index(&self, len: usize) -> usize;
}

/// Thread-local RNG backed source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always answers the same index, clamped to the slice length.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn index(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// What to do when a caller names a category the catalog does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFallback {
    /// Report `InvalidCategory`.
    Strict,
    /// Treat the request as if no category had been given.
    Random,
}

/// Outcome of a draw: the category it came from and the verse picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: String,
    pub reference: VerseReference,
}

pub struct SelectionEngine {
    catalog: Arc<Catalog>,
    rng: Arc<dyn RandomSource>,
}

impl SelectionEngine {
    pub fn new(catalog: Arc<Catalog>, rng: Arc<dyn RandomSource>) -> Self {
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Picks a verse from `category`, or from a random category when `None`.
    ///
    /// The random case is a two-stage draw: category first, then a verse inside
    /// it, so small categories are not drowned out by large ones.
    pub fn pick_reference(&self, category: Option<&str>) -> Result<Selection> {
        self.pick_with_fallback(category, CategoryFallback::Strict)
    }

    pub fn pick_with_fallback(
        &self,
        category: Option<&str>,
        fallback: CategoryFallback,
    ) -> Result<Selection> {
        let chosen = match category {
            Some(name) => match self.catalog.get(name) {
                Some(c) => c,
                None if fallback == CategoryFallback::Random => {
                    debug!(category = %name, "Unknown category, falling back to a random one");
                    self.random_category()?
                }
                None => {
                    return Err(AyahError::InvalidCategory {
                        name: name.to_string(),
                        available: self.catalog.names(),
                    })
                }
            },
            None => self.random_category()?,
        };

        let reference = chosen.references[self.rng.index(chosen.references.len())];
        Ok(Selection {
            category: chosen.name.clone(),
            reference,
        })
    }

    fn random_category(&self) -> Result<&Category> {
        let categories = self.catalog.categories();
        if categories.is_empty() {
            return Err(AyahError::Config("verse catalog is empty".to_string()));
        }
        Ok(&categories[self.rng.index(categories.len())])
    }
}
