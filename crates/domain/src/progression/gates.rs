//! Kineticist elemental gates, read from owned feats.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::contains_word;
use crate::entities::ActorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KineticGate {
    Air,
    Earth,
    Fire,
    Metal,
    Water,
    Wood,
}

impl KineticGate {
    pub const ALL: [KineticGate; 6] = [
        KineticGate::Air,
        KineticGate::Earth,
        KineticGate::Fire,
        KineticGate::Metal,
        KineticGate::Water,
        KineticGate::Wood,
    ];

    pub fn key(self) -> &'static str {
        match self {
            KineticGate::Air => "air",
            KineticGate::Earth => "earth",
            KineticGate::Fire => "fire",
            KineticGate::Metal => "metal",
            KineticGate::Water => "water",
            KineticGate::Wood => "wood",
        }
    }
}

impl fmt::Display for KineticGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Gates a kineticist has opened. Only used to highlight matching impulse
/// feats; never filters anything out.
pub fn kineticist_gates(actor: &ActorSnapshot) -> BTreeSet<KineticGate> {
    if actor.class_slug().as_deref() != Some("kineticist") {
        return BTreeSet::new();
    }
    actor
        .feats
        .iter()
        .filter(|f| contains_word(&f.name, "gate") || contains_word(&f.name, "junction"))
        .flat_map(|f| {
            KineticGate::ALL
                .into_iter()
                .filter(|gate| contains_word(&f.name, gate.key()))
        })
        .collect()
}
