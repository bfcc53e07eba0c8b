use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Scale, Ticker};

/// Named attribute that can be mirrored from one graphic onto another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Scale,
    Ticker,
    XScale,
    YScale,
}

impl Property {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Ticker => "ticker",
            Self::XScale => "x_scale",
            Self::YScale => "y_scale",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scale(Scale),
    Ticker(Ticker),
}

/// Source side of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSource {
    pub tag: String,
    pub property: Property,
}

/// Destination tag -> destination property -> source.
///
/// A destination property has at most one source; mapping it again replaces
/// the previous link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingRegistry {
    links: IndexMap<String, IndexMap<Property, MappingSource>>,
}

impl MappingRegistry {
    pub fn insert(
        &mut self,
        dest: &str,
        dest_property: Property,
        source: &str,
        source_property: Property,
    ) -> Option<MappingSource> {
        self.links.entry(dest.to_owned()).or_default().insert(
            dest_property,
            MappingSource {
                tag: source.to_owned(),
                property: source_property,
            },
        )
    }

    pub fn remove(&mut self, dest: &str, dest_property: Property) -> Option<MappingSource> {
        let properties = self.links.get_mut(dest)?;
        let removed = properties.shift_remove(&dest_property);
        if properties.is_empty() {
            self.links.shift_remove(dest);
        }
        removed
    }

    /// Drops every link whose destination is `dest`.
    pub fn remove_dest(&mut self, dest: &str) {
        self.links.shift_remove(dest);
    }

    #[must_use]
    pub fn source_of(&self, dest: &str, dest_property: Property) -> Option<&MappingSource> {
        self.links.get(dest)?.get(&dest_property)
    }

    pub fn links_of(&self, dest: &str) -> impl Iterator<Item = (Property, &MappingSource)> {
        self.links
            .get(dest)
            .into_iter()
            .flat_map(|properties| properties.iter().map(|(property, source)| (*property, source)))
    }

    /// Destination tags reading from `source`, excluding self links.
    #[must_use]
    pub fn dependents_of(&self, source: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|(dest, properties)| {
                dest.as_str() != source && properties.values().any(|link| link.tag == source)
            })
            .map(|(dest, _)| dest.as_str())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
