//! Process-wide compendium cache.
//!
//! Each content kind is read from its configured packs at most once and
//! memoized. The pending load is registered in the map before anything is
//! awaited, so callers that arrive while a load is in flight join it
//! instead of starting another bulk read.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;

use levelwright_domain::{
    AncestryDocument, ClassDocument, DocumentRef, FeatDocument, SpellDocument,
};

use super::error::ContentError;
use super::filter::{FeatFilter, SpellFilter};
use crate::infrastructure::app_settings::ModuleSettings;
use crate::infrastructure::ports::{ContentResolver, ContentSource};

pub const DEFAULT_FEAT_PACK: &str = "pf2e.feats-srd";
pub const DEFAULT_SPELL_PACK: &str = "pf2e.spells-srd";
pub const DEFAULT_CLASS_PACK: &str = "pf2e.classes";
pub const DEFAULT_ANCESTRY_PACK: &str = "pf2e.ancestries";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Feats,
    Spells,
    Classes,
    Ancestries,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::Feats => "feats",
            ContentKind::Spells => "spells",
            ContentKind::Classes => "classes",
            ContentKind::Ancestries => "ancestries",
        })
    }
}

/// Which packs feed each content kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPacks {
    pub feats: Vec<String>,
    pub spells: Vec<String>,
    pub classes: Vec<String>,
    pub ancestries: Vec<String>,
}

impl Default for ContentPacks {
    fn default() -> Self {
        Self {
            feats: vec![DEFAULT_FEAT_PACK.to_string()],
            spells: vec![DEFAULT_SPELL_PACK.to_string()],
            classes: vec![DEFAULT_CLASS_PACK.to_string()],
            ancestries: vec![DEFAULT_ANCESTRY_PACK.to_string()],
        }
    }
}

impl ContentPacks {
    /// System packs plus any extra feat/spell packs from module settings.
    pub fn from_settings(settings: &ModuleSettings) -> Self {
        let mut packs = Self::default();
        packs
            .feats
            .extend(settings.additional_feat_packs().iter().cloned());
        packs
            .spells
            .extend(settings.additional_spell_packs().iter().cloned());
        packs
    }

    pub fn for_kind(&self, kind: ContentKind) -> &[String] {
        match kind {
            ContentKind::Feats => &self.feats,
            ContentKind::Spells => &self.spells,
            ContentKind::Classes => &self.classes,
            ContentKind::Ancestries => &self.ancestries,
        }
    }
}

/// A document type that can be decoded from a pack entry.
trait PackDocument: DeserializeOwned + Send + Sized + 'static {
    fn decode(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl PackDocument for FeatDocument {
    fn decode(value: Value) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_value(value.clone())?;
        doc.raw = value;
        Ok(doc)
    }
}

impl PackDocument for SpellDocument {
    fn decode(value: Value) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_value(value.clone())?;
        doc.raw = value;
        Ok(doc)
    }
}

impl PackDocument for ClassDocument {}
impl PackDocument for AncestryDocument {}

#[derive(Clone)]
enum Loaded {
    Feats(Arc<Vec<FeatDocument>>),
    Spells(Arc<Vec<SpellDocument>>),
    Classes(Arc<Vec<ClassDocument>>),
    Ancestries(Arc<Vec<AncestryDocument>>),
}

type PendingLoad = Shared<BoxFuture<'static, Loaded>>;

pub struct ContentCache {
    source: Arc<dyn ContentSource>,
    resolver: Arc<dyn ContentResolver>,
    packs: ContentPacks,
    loads: DashMap<ContentKind, PendingLoad>,
}

impl ContentCache {
    pub fn new(
        source: Arc<dyn ContentSource>,
        resolver: Arc<dyn ContentResolver>,
        packs: ContentPacks,
    ) -> Self {
        Self {
            source,
            resolver,
            packs,
            loads: DashMap::new(),
        }
    }

    pub fn packs(&self) -> &ContentPacks {
        &self.packs
    }

    // === Bulk Content ===

    pub async fn all_feats(&self) -> Arc<Vec<FeatDocument>> {
        match self.pending(ContentKind::Feats).await {
            Loaded::Feats(feats) => feats,
            _ => Arc::default(),
        }
    }

    pub async fn get_feats(&self, filter: &FeatFilter) -> Vec<FeatDocument> {
        let feats = self.all_feats().await;
        let matching = feats.iter().filter(|f| filter.matches(f)).cloned();
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub async fn all_spells(&self) -> Arc<Vec<SpellDocument>> {
        match self.pending(ContentKind::Spells).await {
            Loaded::Spells(spells) => spells,
            _ => Arc::default(),
        }
    }

    pub async fn get_spells(&self, filter: &SpellFilter) -> Vec<SpellDocument> {
        let spells = self.all_spells().await;
        let matching = spells.iter().filter(|s| filter.matches(s)).cloned();
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub async fn get_classes(&self) -> Arc<Vec<ClassDocument>> {
        match self.pending(ContentKind::Classes).await {
            Loaded::Classes(classes) => classes,
            _ => Arc::default(),
        }
    }

    pub async fn get_ancestries(&self) -> Arc<Vec<AncestryDocument>> {
        match self.pending(ContentKind::Ancestries).await {
            Loaded::Ancestries(ancestries) => ancestries,
            _ => Arc::default(),
        }
    }

    /// Forget one kind so the next read goes back to the packs. Loads
    /// already in flight still complete for the callers awaiting them.
    pub fn clear_cache_for(&self, kind: ContentKind) {
        self.loads.remove(&kind);
        tracing::debug!(%kind, "Cleared content cache");
    }

    pub fn clear_cache(&self) {
        self.loads.clear();
        tracing::debug!("Cleared all content caches");
    }

    pub fn is_cached(&self, kind: ContentKind) -> bool {
        self.loads.contains_key(&kind)
    }

    // === Single Documents ===

    pub async fn resolve_feat(
        &self,
        reference: &DocumentRef,
    ) -> Result<Option<FeatDocument>, ContentError> {
        self.resolve(reference).await
    }

    pub async fn resolve_spell(
        &self,
        reference: &DocumentRef,
    ) -> Result<Option<SpellDocument>, ContentError> {
        self.resolve(reference).await
    }

    async fn resolve<T: PackDocument>(
        &self,
        reference: &DocumentRef,
    ) -> Result<Option<T>, ContentError> {
        let value = self
            .resolver
            .resolve(reference)
            .await
            .map_err(|e| ContentError::Resolve {
                reference: reference.clone(),
                message: e.to_string(),
            })?;
        value
            .map(T::decode)
            .transpose()
            .map_err(|e| ContentError::Resolve {
                reference: reference.clone(),
                message: e.to_string(),
            })
    }

    // === Loading ===

    /// The shared load for `kind`, starting one if none is registered.
    fn pending(&self, kind: ContentKind) -> PendingLoad {
        self.loads
            .entry(kind)
            .or_insert_with(|| self.start_load(kind))
            .value()
            .clone()
    }

    fn start_load(&self, kind: ContentKind) -> PendingLoad {
        let source = Arc::clone(&self.source);
        let packs = self.packs.for_kind(kind).to_vec();
        async move {
            match kind {
                ContentKind::Feats => Loaded::Feats(Arc::new(load_documents(source, kind, packs).await)),
                ContentKind::Spells => {
                    Loaded::Spells(Arc::new(load_documents(source, kind, packs).await))
                }
                ContentKind::Classes => {
                    Loaded::Classes(Arc::new(load_documents(source, kind, packs).await))
                }
                ContentKind::Ancestries => {
                    Loaded::Ancestries(Arc::new(load_documents(source, kind, packs).await))
                }
            }
        }
        .boxed()
        .shared()
    }
}

async fn load_documents<T: PackDocument>(
    source: Arc<dyn ContentSource>,
    kind: ContentKind,
    packs: Vec<String>,
) -> Vec<T> {
    let mut documents = Vec::new();
    for pack in &packs {
        let values = match source.get_documents(pack).await {
            Ok(values) => values,
            Err(e) => {
                let err = if e.is_not_found() {
                    ContentError::SourceMissing(pack.clone())
                } else {
                    ContentError::Load {
                        kind,
                        pack: pack.clone(),
                        source: e,
                    }
                };
                tracing::warn!(%kind, pack = %pack, error = %err, "Skipping content pack");
                continue;
            }
        };
        for value in values {
            match T::decode(value) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!(%kind, pack = %pack, error = %e, "Skipping malformed document")
                }
            }
        }
    }
    tracing::info!(%kind, count = documents.len(), packs = packs.len(), "Loaded compendium content");
    documents
}
