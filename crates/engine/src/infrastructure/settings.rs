//! Reads planner configuration out of the host settings store.

use std::sync::Arc;

use serde_json::{Map, Value};

use levelwright_domain::{AbpSetting, MythicSetting, PlannerConfig, VariantRules};

use crate::infrastructure::app_settings::{ModuleSettings, MODULE_NAMESPACE};
use crate::infrastructure::ports::{RepoError, SettingsRepo};

/// Namespace of the game system's own variant-rule settings.
pub const SYSTEM_NAMESPACE: &str = "pf2e";

/// Host setting carrying whether the ancestry paragon companion module is
/// active.
pub const PARAGON_MODULE_NAMESPACE: &str = "modules";
pub const PARAGON_MODULE_KEY: &str = "pf2e-ancestry-paragon";

const MODULE_KEYS: [&str; 7] = [
    "additionalFeatPacks",
    "additionalSpellPacks",
    "featSortMethod",
    "debug",
    "autosaveDelayMs",
    "archetypeExceptions",
    "includeUncommonSpells",
];

/// Everything the engine reads from host settings, captured at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    pub planner: PlannerConfig,
    pub module: ModuleSettings,
}

/// Settings reader over the host configuration store.
///
/// Missing keys fall back to defaults; a value of the wrong shape is
/// logged and treated as missing.
pub struct HostSettings {
    repo: Arc<dyn SettingsRepo>,
}

impl HostSettings {
    pub fn new(repo: Arc<dyn SettingsRepo>) -> Self {
        Self { repo }
    }

    pub async fn variant_rules(&self) -> Result<VariantRules, RepoError> {
        let mythic = match self.string(SYSTEM_NAMESPACE, "mythic").await?.as_deref() {
            Some("enabled") => MythicSetting::Enabled,
            _ => MythicSetting::Disabled,
        };
        let abp = self
            .string(SYSTEM_NAMESPACE, "automaticBonusVariant")
            .await?
            .and_then(|key| {
                let parsed = AbpSetting::from_key(&key);
                if parsed.is_none() {
                    tracing::warn!(value = %key, "Unknown automatic bonus setting; using noABP");
                }
                parsed
            })
            .unwrap_or_default();

        Ok(VariantRules {
            free_archetype: self.flag(SYSTEM_NAMESPACE, "freeArchetypeVariant").await?,
            gradual_boosts: self.flag(SYSTEM_NAMESPACE, "gradualBoostsVariant").await?,
            ancestry_paragon: self.flag(SYSTEM_NAMESPACE, "ancestryParagonVariant").await?,
            dual_class: self.flag(SYSTEM_NAMESPACE, "dualClassVariant").await?,
            mythic,
            abp,
        })
    }

    pub async fn module_settings(&self) -> Result<ModuleSettings, RepoError> {
        let mut object = Map::new();
        for key in MODULE_KEYS {
            if let Some(value) = self.repo.get(MODULE_NAMESPACE, key).await? {
                object.insert(key.to_string(), value);
            }
        }
        match serde_json::from_value(Value::Object(object)) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid module settings; using defaults");
                Ok(ModuleSettings::default())
            }
        }
    }

    /// Read every setting and build the config snapshot passed to the rules.
    pub async fn load(&self) -> Result<SettingsSnapshot, RepoError> {
        let variant_rules = self.variant_rules().await?;
        let module = self.module_settings().await?;
        let paragon_module = self.flag(PARAGON_MODULE_NAMESPACE, PARAGON_MODULE_KEY).await?;

        let planner = PlannerConfig::new(variant_rules)
            .with_feat_sort(module.feat_sort_method())
            .with_ancestry_paragon_module(paragon_module)
            .with_archetype_exceptions(module.archetype_exceptions().to_vec())
            .with_uncommon_spells(module.include_uncommon_spells());

        tracing::debug!(?variant_rules, "Loaded planner settings");
        Ok(SettingsSnapshot { planner, module })
    }

    async fn flag(&self, namespace: &str, key: &str) -> Result<bool, RepoError> {
        Ok(match self.repo.get(namespace, key).await? {
            Some(Value::Bool(b)) => b,
            Some(Value::Null) | None => false,
            Some(other) => {
                tracing::warn!(namespace, key, value = %other, "Expected boolean setting");
                false
            }
        })
    }

    async fn string(&self, namespace: &str, key: &str) -> Result<Option<String>, RepoError> {
        Ok(match self.repo.get(namespace, key).await? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!(namespace, key, value = %other, "Expected string setting");
                None
            }
        })
    }
}
