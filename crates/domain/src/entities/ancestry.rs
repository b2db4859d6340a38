use serde::{Deserialize, Serialize};

use crate::common::slugify;
use crate::ids::DocumentRef;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AncestryDocument {
    pub uuid: Option<DocumentRef>,
    pub name: String,
    pub slug: Option<String>,
    pub traits: Vec<String>,
}

impl AncestryDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn ancestry_slug(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.name),
        }
    }
}

/// Heritage item. Versatile heritages have no parent ancestry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HeritageDocument {
    pub uuid: Option<DocumentRef>,
    pub name: String,
    pub slug: Option<String>,
    pub ancestry_slug: Option<String>,
}

impl HeritageDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn heritage_slug(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.name),
        }
    }
}
