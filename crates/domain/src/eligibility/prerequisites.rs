//! Free-text prerequisite checking.
//!
//! Each prerequisite line is classified by the first rule that recognizes
//! it. Lines nothing recognizes stay indeterminate instead of failing the
//! check, so the result is three-valued.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::common::{contains_word, eq_ignore_case};
use crate::entities::{ActorSnapshot, FeatDocument};
use crate::value_objects::{Ability, ProficiencyRank, Skill};

static ABILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(strength|dexterity|constitution|intelligence|wisdom|charisma|str|dex|con|int|wis|cha)\b(?:\s+(?:modifier|score))?(?:\s+of)?\s*\+?(-?\d+)",
    )
    .expect("valid regex")
});
static FEAT_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(feat|dedication|archetype)\b").expect("valid regex"));
static RANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(trained|expert|master|legendary)\b").expect("valid regex"));

/// Requirement values above this compare against the score, not the
/// modifier.
const SCORE_THRESHOLD: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Met,
    Missing,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteCheck {
    /// `Some(false)` if anything is missing, `None` if anything could not
    /// be judged, `Some(true)` otherwise.
    pub meets: Option<bool>,
    pub missing: Vec<String>,
    pub unknown: Vec<String>,
}

fn check_ability(actor: &ActorSnapshot, line: &str) -> Option<LineOutcome> {
    let caps = ABILITY_RE.captures(line)?;
    let ability = Ability::from_name(caps.get(1)?.as_str())?;
    let required: i32 = caps.get(2)?.as_str().parse().ok()?;
    let score = actor.abilities.get(ability);
    let actual = if required > SCORE_THRESHOLD {
        score.value
    } else {
        score.modifier
    };
    Some(if actual >= required {
        LineOutcome::Met
    } else {
        LineOutcome::Missing
    })
}

fn check_feat(actor: &ActorSnapshot, line: &str) -> Option<LineOutcome> {
    if actor.feats.iter().any(|f| eq_ignore_case(&f.name, line)) {
        return Some(LineOutcome::Met);
    }
    if !FEAT_KEYWORD_RE.is_match(line) {
        return None;
    }
    let owned = actor.feats.iter().any(|f| contains_word(line, &f.name));
    Some(if owned {
        LineOutcome::Met
    } else {
        LineOutcome::Missing
    })
}

fn check_proficiency(actor: &ActorSnapshot, line: &str) -> Option<LineOutcome> {
    let caps = RANK_RE.captures(line)?;
    let required = ProficiencyRank::from_keyword(caps.get(1)?.as_str())?;
    let skills: Vec<Skill> = Skill::ALL
        .into_iter()
        .filter(|skill| contains_word(line, skill.key()))
        .collect();
    if skills.is_empty() {
        return None;
    }
    let met = skills.iter().any(|skill| actor.skill_rank(*skill) >= required);
    Some(if met {
        LineOutcome::Met
    } else {
        LineOutcome::Missing
    })
}

/// Classify one prerequisite line against the actor.
pub fn check_line(actor: &ActorSnapshot, line: &str) -> LineOutcome {
    if let Some(outcome) = check_ability(actor, line) {
        return outcome;
    }
    if let Some(outcome) = check_feat(actor, line) {
        return outcome;
    }
    if let Some(outcome) = check_proficiency(actor, line) {
        return outcome;
    }
    // class, ancestry, heritage and narrative requirements are not modelled
    LineOutcome::Unknown
}

pub fn check_prerequisites(actor: &ActorSnapshot, feat: &FeatDocument) -> PrerequisiteCheck {
    let mut check = PrerequisiteCheck::default();
    for line in feat.prerequisites.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        match check_line(actor, line) {
            LineOutcome::Met => {}
            LineOutcome::Missing => check.missing.push(line.to_string()),
            LineOutcome::Unknown => check.unknown.push(line.to_string()),
        }
    }
    check.meets = if !check.missing.is_empty() {
        Some(false)
    } else if !check.unknown.is_empty() {
        None
    } else {
        Some(true)
    };
    check
}
