use serde::{Deserialize, Serialize};
use std::fmt;

/// A verse address in the standard surah/ayah numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseReference {
    pub surah: u16,
    pub ayah: u16,
}

impl VerseReference {
    pub const fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// A named mood with its curated verses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub references: Vec<VerseReference>,
}

/// Name and size of a category, as listed by the categories endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

/// Immutable category -> verses mapping, loaded once at startup.
///
/// Categories keep their declaration order so listings are stable.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog, dropping categories that have no references.
    pub fn new(categories: Vec<Category>) -> Self {
        let categories = categories
            .into_iter()
            .filter(|c| !c.references.is_empty())
            .collect();
        Self { categories }
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|c| CategorySummary {
                name: c.name.clone(),
                count: c.references.len(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The curated catalog served in production.
    pub fn builtin() -> Self {
        let table: [(&str, &[(u16, u16)]); 8] = [
            (
                "motivation",
                &[(2, 286), (94, 5), (94, 6), (3, 139), (8, 46), (41, 30), (39, 53), (65, 3)],
            ),
            (
                "calmness",
                &[(13, 28), (2, 62), (20, 2), (16, 97), (25, 70), (89, 27), (89, 28)],
            ),
            (
                "sadness",
                &[(39, 53), (2, 214), (12, 87), (94, 5), (3, 139), (21, 83), (12, 86)],
            ),
            (
                "anxiety",
                &[(65, 3), (8, 2), (13, 28), (2, 286), (3, 173), (9, 51)],
            ),
            (
                "gratitude",
                &[(14, 7), (2, 152), (16, 18), (27, 40), (31, 12)],
            ),
            (
                "patience",
                &[(2, 45), (2, 153), (3, 200), (11, 115), (76, 12)],
            ),
            ("hope", &[(39, 53), (12, 87), (65, 4), (94, 5), (2, 216)]),
            ("forgiveness", &[(39, 53), (25, 70), (4, 110), (42, 25)]),
        ];

        let categories = table
            .iter()
            .map(|(name, refs)| Category {
                name: (*name).to_string(),
                references: refs
                    .iter()
                    .map(|&(surah, ayah)| VerseReference::new(surah, ayah))
                    .collect(),
            })
            .collect();

        Self::new(categories)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
