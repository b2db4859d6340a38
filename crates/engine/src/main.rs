//! Levelwright engine - command line entry point.
//!
//! Prints the requirements and candidate pools for one actor at a target
//! level, reading compendium packs from a directory of JSON files.
//!
//! ```text
//! LEVELWRIGHT_ACTOR=actor.json LEVELWRIGHT_DATA_DIR=packs levelwright-engine 5
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use levelwright_domain::{ActorSnapshot, CompatibilityReport, PlanValidation};
use levelwright_engine::infrastructure::content_sources::JsonDirContentSource;
use levelwright_engine::infrastructure::memory::InMemoryHost;
use levelwright_engine::infrastructure::notifier::LogNotifier;
use levelwright_engine::infrastructure::settings::HostSettings;
use levelwright_engine::use_cases::planning::LevelOptions;
use levelwright_engine::{App, HostPorts};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelSummary {
    actor: String,
    level: u8,
    options: LevelOptions,
    validation: PlanValidation,
    compatibility: CompatibilityReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    let data_dir = PathBuf::from(
        std::env::var("LEVELWRIGHT_DATA_DIR").unwrap_or_else(|_| "data".into()),
    );
    let actor_path = std::env::var("LEVELWRIGHT_ACTOR")
        .map(PathBuf::from)
        .context("LEVELWRIGHT_ACTOR must point at an actor JSON file")?;

    let host = Arc::new(InMemoryHost::new());
    if let Ok(path) = std::env::var("LEVELWRIGHT_SETTINGS") {
        load_settings(&host, Path::new(&path)).await?;
    }

    // Module settings decide the default log level, so read them first.
    let debug = HostSettings::new(host.clone())
        .module_settings()
        .await?
        .debug();
    let default_filter = if debug {
        "levelwright_engine=debug"
    } else {
        "levelwright_engine=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let actor = load_actor(&actor_path).await?;
    let level = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u8>()
            .with_context(|| format!("invalid level argument: {arg}"))?,
        None => actor.level.saturating_add(1),
    };
    if !(1..=20).contains(&level) {
        bail!("level must be between 1 and 20, got {level}");
    }
    host.insert_actor(actor.clone()).await;

    tracing::info!(
        actor = %actor.id,
        level,
        data_dir = %data_dir.display(),
        "Computing level options"
    );

    let packs = Arc::new(JsonDirContentSource::new(data_dir));
    let ports = HostPorts::in_memory(host, Arc::new(LogNotifier::new()))
        .with_content(packs.clone(), packs);
    let app = App::new(ports).await?;

    let plan = app.plan_for(&actor).await?;
    let summary = LevelSummary {
        actor: actor.name.clone(),
        level,
        options: app.level_options(&actor, level).await,
        validation: app.validate(&actor, &plan),
        compatibility: app.compatibility(&plan),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn load_actor(path: &Path) -> anyhow::Result<ActorSnapshot> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading actor file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing actor file {}", path.display()))
}

/// Settings file shape: `{ "<namespace>": { "<key>": <value> } }`.
async fn load_settings(host: &InMemoryHost, path: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let Value::Object(namespaces) = serde_json::from_str(&content)? else {
        bail!("settings file must hold an object of namespaces");
    };
    for (namespace, keys) in namespaces {
        let Value::Object(keys) = keys else {
            bail!("settings namespace {namespace} must hold an object");
        };
        for (key, value) in keys {
            host.set_setting(&namespace, &key, value);
        }
    }
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
