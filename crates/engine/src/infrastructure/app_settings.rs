//! Module-level settings for the planner.
//!
//! These live in the host's settings store under the module namespace and
//! are read once per [`crate::infrastructure::settings::HostSettings::load`].
//! Every field has a serde default so partially-written settings still
//! deserialize.

use serde::{Deserialize, Serialize};

use levelwright_domain::FeatSortMethod;

/// Namespace the module's own settings and flags are stored under.
pub const MODULE_NAMESPACE: &str = "levelwright";

fn default_autosave_delay_ms() -> u64 {
    1500
}

/// All configurable module settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSettings {
    /// Extra compendium packs merged into the feat pool.
    #[serde(default)]
    additional_feat_packs: Vec<String>,

    /// Extra compendium packs merged into the spell pool.
    #[serde(default)]
    additional_spell_packs: Vec<String>,

    #[serde(default)]
    feat_sort_method: FeatSortMethod,

    /// Raise log verbosity for planner internals.
    #[serde(default)]
    debug: bool,

    /// Debounce window before an edited plan is written back.
    #[serde(default = "default_autosave_delay_ms")]
    autosave_delay_ms: u64,

    /// Feat slugs offered to archetype queries even without the archetype trait.
    #[serde(default)]
    archetype_exceptions: Vec<String>,

    #[serde(default)]
    include_uncommon_spells: bool,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            additional_feat_packs: Vec::new(),
            additional_spell_packs: Vec::new(),
            feat_sort_method: FeatSortMethod::default(),
            debug: false,
            autosave_delay_ms: default_autosave_delay_ms(),
            archetype_exceptions: Vec::new(),
            include_uncommon_spells: false,
        }
    }
}

impl ModuleSettings {
    pub fn additional_feat_packs(&self) -> &[String] {
        &self.additional_feat_packs
    }

    pub fn additional_spell_packs(&self) -> &[String] {
        &self.additional_spell_packs
    }

    pub fn feat_sort_method(&self) -> FeatSortMethod {
        self.feat_sort_method
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn autosave_delay_ms(&self) -> u64 {
        self.autosave_delay_ms
    }

    pub fn archetype_exceptions(&self) -> &[String] {
        &self.archetype_exceptions
    }

    pub fn include_uncommon_spells(&self) -> bool {
        self.include_uncommon_spells
    }

    pub fn with_additional_feat_packs(mut self, packs: Vec<String>) -> Self {
        self.additional_feat_packs = packs;
        self
    }

    pub fn with_additional_spell_packs(mut self, packs: Vec<String>) -> Self {
        self.additional_spell_packs = packs;
        self
    }

    pub fn with_feat_sort_method(mut self, method: FeatSortMethod) -> Self {
        self.feat_sort_method = method;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_autosave_delay_ms(mut self, delay: u64) -> Self {
        self.autosave_delay_ms = delay;
        self
    }
}
