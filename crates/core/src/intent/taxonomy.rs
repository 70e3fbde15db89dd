use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TagFamily;

/// Externally owned allow-list of canonical tags, keyed by family name.
///
/// An absent or empty family places no restriction on that family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    families: BTreeMap<String, BTreeSet<String>>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family<I, S>(mut self, family: TagFamily, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.families.entry(family.as_str().to_owned()).or_default();
        entry.extend(tags.into_iter().filter_map(|tag| canonical(tag.as_ref())));
        self
    }

    /// Builds a taxonomy from loosely shaped JSON.
    ///
    /// Non-object roots, non-array families and non-string entries are
    /// ignored rather than rejected.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let families = object
            .iter()
            .filter_map(|(family, tags)| {
                let tags = tags.as_array()?;
                let allowed = tags
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(canonical)
                    .collect::<BTreeSet<_>>();
                Some((family.trim().to_ascii_lowercase(), allowed))
            })
            .collect();

        Self { families }
    }

    pub fn is_empty(&self) -> bool {
        self.families.values().all(BTreeSet::is_empty)
    }

    pub fn allowed(&self, family: TagFamily) -> Option<&BTreeSet<String>> {
        self.families.get(family.as_str()).filter(|tags| !tags.is_empty())
    }

    pub fn allows(&self, family: TagFamily, tag: &str) -> bool {
        self.allowed(family).map(|tags| tags.contains(tag)).unwrap_or(true)
    }
}

fn canonical(tag: &str) -> Option<String> {
    let tag = tag.trim().to_ascii_lowercase();
    (!tag.is_empty()).then_some(tag)
}
