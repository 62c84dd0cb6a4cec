use std::collections::HashMap;

/// Maps a car model code to the category label it races under.
///
/// Implementations never fail: a model code with no assignment resolves to
/// itself, so an empty or unreachable store degrades to one category per
/// car model.
pub trait CategoryResolver {
    fn resolve(&self, model_code: &str) -> String;
}

/// Snapshot of the external vehicle -> category assignments, loaded once
/// per aggregation so concurrent admin edits cannot split a single request
/// across two views of the store.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    assignments: HashMap<String, String>,
}

impl CategoryMap {
    pub fn new(assignments: HashMap<String, String>) -> Self {
        Self { assignments }
    }

    /// Identity-only resolution, the fallback when the store is down.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl CategoryResolver for CategoryMap {
    fn resolve(&self, model_code: &str) -> String {
        self.assignments
            .get(model_code)
            .cloned()
            .unwrap_or_else(|| model_code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{CategoryMap, CategoryResolver};

    #[test]
    fn test_mapped_code() {
        let map = CategoryMap::new(HashMap::from([(
            "ks_audi_r8".to_string(),
            "GT/Track-Day".to_string(),
        )]));

        assert_eq!(map.resolve("ks_audi_r8"), "GT/Track-Day");
    }

    #[test]
    fn test_unmapped_code_is_its_own_category() {
        assert_eq!(CategoryMap::empty().resolve("xyz123"), "xyz123");
    }
}
