//! Persisted pulley metadata and pair resolution.
//!
//! A pulley-generation step tags each generated entity with a namespaced
//! key/value set; a belt-generation step later locates the matching
//! drive/driven pair among whatever entities exist. Resolution is a
//! priority-ordered chain of fallback strategies, tried in sequence until
//! one produces both roles: explicit selection, shared `pair_id` tags,
//! first-seen tagged roles, then a name-substring heuristic.

use crate::float_types::{CM, Real};
use crate::layout::DriveLayout;
use crate::pulley::PulleyRole;
use core::str::FromStr;
use nalgebra::Point2;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Namespace under which all pulley attributes are stored.
pub const ATTRIBUTE_GROUP: &str = "beltlayout.pulley";
/// Attribute key: `"drive"` or `"driven"`.
pub const ATTR_ROLE: &str = "role";
/// Attribute key: opaque token shared by one drive/driven pair.
pub const ATTR_PAIR_ID: &str = "pair_id";
/// Attribute key: tooth count as a decimal string.
pub const ATTR_TOOTH_COUNT: &str = "tooth_count";
/// Attribute key: belt pitch in cm, ten fractional digits.
pub const ATTR_BELT_PITCH_CM: &str = "belt_pitch_cm";
/// Attribute key: tooth height in cm, ten fractional digits.
pub const ATTR_TOOTH_HEIGHT_CM: &str = "tooth_height_cm";

/// The metadata one generated pulley carries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulleyTag {
    /// Drive or driven side.
    pub role: PulleyRole,
    /// Opaque token shared by the two pulleys of one pair.
    pub pair_id: String,
    /// Tooth count.
    pub tooth_count: u32,
    /// Belt pitch, crate length units (mm-based).
    pub belt_pitch: Real,
    /// Tooth height, crate length units.
    pub tooth_height: Real,
}

impl PulleyTag {
    /// Serialize into the persisted attribute map. Lengths are stored in
    /// cm with ten fractional digits, matching the schema a consumer
    /// parses back.
    #[must_use]
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (ATTR_ROLE.to_owned(), self.role.to_string()),
            (ATTR_PAIR_ID.to_owned(), self.pair_id.clone()),
            (ATTR_TOOTH_COUNT.to_owned(), self.tooth_count.to_string()),
            (
                ATTR_BELT_PITCH_CM.to_owned(),
                format!("{:.10}", self.belt_pitch / CM),
            ),
            (
                ATTR_TOOTH_HEIGHT_CM.to_owned(),
                format!("{:.10}", self.tooth_height / CM),
            ),
        ])
    }

    /// Parse a tag back from an attribute map; `None` when any field is
    /// missing or malformed.
    #[must_use]
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Option<Self> {
        Some(Self {
            role: parse_role(attributes.get(ATTR_ROLE)?)?,
            pair_id: attributes.get(ATTR_PAIR_ID)?.clone(),
            tooth_count: u32::from_str(attributes.get(ATTR_TOOTH_COUNT)?).ok()?,
            belt_pitch: Real::from_str(attributes.get(ATTR_BELT_PITCH_CM)?).ok()? * CM,
            tooth_height: Real::from_str(attributes.get(ATTR_TOOTH_HEIGHT_CM)?).ok()? * CM,
        })
    }
}

/// Tags for both pulleys of a planned layout, sharing `pair_id`.
#[must_use]
pub fn tag_pair(layout: &DriveLayout, pair_id: &str) -> (PulleyTag, PulleyTag) {
    let tag = |role, tooth_count| PulleyTag {
        role,
        pair_id: pair_id.to_owned(),
        tooth_count,
        belt_pitch: layout.config.belt.belt_pitch,
        tooth_height: layout.config.belt.tooth_height,
    };
    (
        tag(PulleyRole::Drive, layout.drive.tooth_count()),
        tag(PulleyRole::Driven, layout.driven.tooth_count()),
    )
}

fn parse_role(value: &str) -> Option<PulleyRole> {
    match value.to_ascii_lowercase().as_str() {
        "drive" => Some(PulleyRole::Drive),
        "driven" => Some(PulleyRole::Driven),
        _ => None,
    }
}

/// Host-entity stand-in the resolver chain works over: a display name, a
/// placement, and whatever attributes the entity carries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulleyRecord {
    /// Display name as shown to the user.
    pub name: String,
    /// Entity placement in the layout plane.
    pub center: Point2<Real>,
    /// Namespaced attribute map (the [`ATTRIBUTE_GROUP`] contents).
    pub attributes: BTreeMap<String, String>,
}

impl PulleyRecord {
    fn role(&self) -> Option<PulleyRole> {
        self.attributes.get(ATTR_ROLE).and_then(|v| parse_role(v))
    }

    fn pair_id(&self) -> Option<&str> {
        self.attributes.get(ATTR_PAIR_ID).map(String::as_str)
    }
}

/// Inputs to pair resolution.
#[derive(Debug, Clone, Default)]
pub struct PairQuery<'a> {
    /// All candidate records, in host traversal order.
    pub records: &'a [PulleyRecord],
    /// Index of an explicitly selected drive record, if any.
    pub selected_drive: Option<usize>,
    /// Index of an explicitly selected driven record, if any.
    pub selected_driven: Option<usize>,
}

/// Which strategy resolved the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResolutionTier {
    /// Both records explicitly selected.
    Selection,
    /// A `pair_id` carried both roles.
    TaggedPair,
    /// First-seen tagged record per role.
    TaggedRole,
    /// `"drive"`/`"driven"` tokens in the display names.
    NameHeuristic,
}

impl ResolutionTier {
    /// Human-readable provenance, as reported in summaries.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            ResolutionTier::Selection => "explicitly selected pulley occurrences",
            ResolutionTier::TaggedPair | ResolutionTier::TaggedRole => {
                "attribute-tagged pulley occurrences"
            },
            ResolutionTier::NameHeuristic => "name-detected pulley occurrences",
        }
    }
}

/// A resolved drive/driven pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairMatch {
    /// Index of the drive record.
    pub drive: usize,
    /// Index of the driven record.
    pub driven: usize,
    /// Which strategy produced the match.
    pub tier: ResolutionTier,
}

fn resolve_selection(query: &PairQuery<'_>) -> Option<(usize, usize)> {
    let drive = query.selected_drive?;
    let driven = query.selected_driven?;
    if drive == driven || drive >= query.records.len() || driven >= query.records.len() {
        return None;
    }
    Some((drive, driven))
}

fn resolve_tagged_pair(query: &PairQuery<'_>) -> Option<(usize, usize)> {
    // Pair ids in first-seen order; within a pair, a duplicate role tag
    // overwrites the earlier one, so the last occurrence wins.
    let mut pairs: Vec<(&str, [Option<usize>; 2])> = Vec::new();
    for (index, record) in query.records.iter().enumerate() {
        let Some(role) = record.role() else { continue };
        let Some(pair_id) = record.pair_id() else {
            continue;
        };
        let found = pairs.iter().position(|(id, _)| *id == pair_id);
        let slot = match found {
            Some(at) => &mut pairs[at].1,
            None => {
                pairs.push((pair_id, [None, None]));
                let at = pairs.len() - 1;
                &mut pairs[at].1
            },
        };
        let position = match role {
            PulleyRole::Drive => 0,
            PulleyRole::Driven => 1,
        };
        slot[position] = Some(index);
    }

    pairs
        .iter()
        .find_map(|(_, [drive, driven])| Some(((*drive)?, (*driven)?)))
}

fn resolve_tagged_roles(query: &PairQuery<'_>) -> Option<(usize, usize)> {
    let mut drive = None;
    let mut driven = None;
    for (index, record) in query.records.iter().enumerate() {
        match record.role() {
            Some(PulleyRole::Drive) if drive.is_none() => drive = Some(index),
            Some(PulleyRole::Driven) if driven.is_none() => driven = Some(index),
            _ => {},
        }
    }
    match (drive, driven) {
        (Some(d), Some(n)) if d != n => Some((d, n)),
        _ => None,
    }
}

fn resolve_names(query: &PairQuery<'_>) -> Option<(usize, usize)> {
    let mut drive = None;
    let mut driven = None;
    for (index, record) in query.records.iter().enumerate() {
        let name = record.name.to_lowercase();
        if !name.contains("pulley") {
            continue;
        }
        if drive.is_none() && name.contains("drive") && !name.contains("driven") {
            drive = Some(index);
        }
        if driven.is_none() && name.contains("driven") {
            driven = Some(index);
        }
    }
    match (drive, driven) {
        (Some(d), Some(n)) if d != n => Some((d, n)),
        _ => None,
    }
}

/// The ordered fallback chain; earlier entries win.
const RESOLUTION_CHAIN: &[(ResolutionTier, fn(&PairQuery<'_>) -> Option<(usize, usize)>)] = &[
    (ResolutionTier::Selection, resolve_selection),
    (ResolutionTier::TaggedPair, resolve_tagged_pair),
    (ResolutionTier::TaggedRole, resolve_tagged_roles),
    (ResolutionTier::NameHeuristic, resolve_names),
];

/// Resolve a drive/driven pair by the best available evidence; the first
/// strategy producing both roles wins.
#[must_use]
pub fn resolve_pulley_pair(query: &PairQuery<'_>) -> Option<PairMatch> {
    RESOLUTION_CHAIN.iter().find_map(|(tier, resolver)| {
        resolver(query).map(|(drive, driven)| PairMatch {
            drive,
            driven,
            tier: *tier,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(name: &str, attributes: &[(&str, &str)]) -> PulleyRecord {
        PulleyRecord {
            name: name.to_owned(),
            center: Point2::new(0.0, 0.0),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    fn tagged(name: &str, role: &str, pair_id: &str) -> PulleyRecord {
        record(name, &[(ATTR_ROLE, role), (ATTR_PAIR_ID, pair_id)])
    }

    #[test]
    fn tag_attributes_round_trip() {
        let tag = PulleyTag {
            role: PulleyRole::Driven,
            pair_id: "f52a".to_owned(),
            tooth_count: 48,
            belt_pitch: 12.7,
            tooth_height: 7.9,
        };
        let attributes = tag.to_attributes();
        assert_eq!(attributes[ATTR_ROLE], "driven");
        assert_eq!(attributes[ATTR_TOOTH_COUNT], "48");
        // Lengths persist in cm with ten fractional digits.
        assert_eq!(attributes[ATTR_BELT_PITCH_CM], "1.2700000000");

        let parsed = PulleyTag::from_attributes(&attributes).unwrap();
        assert_eq!(parsed.role, tag.role);
        assert_eq!(parsed.pair_id, tag.pair_id);
        assert_eq!(parsed.tooth_count, 48);
        assert_relative_eq!(parsed.belt_pitch, 12.7, epsilon = 1e-9);
        assert_relative_eq!(parsed.tooth_height, 7.9, epsilon = 1e-9);
    }

    #[test]
    fn selection_wins_over_tags() {
        let records = vec![
            tagged("A", "drive", "p1"),
            tagged("B", "driven", "p1"),
            tagged("C", "drive", "p2"),
        ];
        let found = resolve_pulley_pair(&PairQuery {
            records: &records,
            selected_drive: Some(2),
            selected_driven: Some(1),
        })
        .unwrap();
        assert_eq!(found.tier, ResolutionTier::Selection);
        assert_eq!((found.drive, found.driven), (2, 1));
    }

    #[test]
    fn pair_id_beats_first_seen_roles() {
        // The lone drive of p1 comes first, but p2 is the first pair
        // with both roles present.
        let records = vec![
            tagged("A", "drive", "p1"),
            tagged("B", "drive", "p2"),
            tagged("C", "driven", "p2"),
        ];
        let found = resolve_pulley_pair(&PairQuery {
            records: &records,
            ..PairQuery::default()
        })
        .unwrap();
        assert_eq!(found.tier, ResolutionTier::TaggedPair);
        assert_eq!((found.drive, found.driven), (1, 2));
    }

    #[test]
    fn duplicate_role_in_a_pair_keeps_the_last_record() {
        // A re-tagged pulley supersedes the stale copy carrying the
        // same pair id and role.
        let records = vec![
            tagged("Old Drive", "drive", "p1"),
            tagged("Driven", "driven", "p1"),
            tagged("New Drive", "drive", "p1"),
        ];
        let found = resolve_pulley_pair(&PairQuery {
            records: &records,
            ..PairQuery::default()
        })
        .unwrap();
        assert_eq!(found.tier, ResolutionTier::TaggedPair);
        assert_eq!((found.drive, found.driven), (2, 1));
    }

    #[test]
    fn first_seen_roles_fall_back_without_a_complete_pair() {
        let records = vec![
            tagged("A", "driven", "p1"),
            tagged("B", "drive", "p2"),
        ];
        let found = resolve_pulley_pair(&PairQuery {
            records: &records,
            ..PairQuery::default()
        })
        .unwrap();
        assert_eq!(found.tier, ResolutionTier::TaggedRole);
        assert_eq!((found.drive, found.driven), (1, 0));
    }

    #[test]
    fn name_heuristic_is_the_last_resort() {
        let records = vec![
            record("Motor Mount", &[]),
            record("24T Drive Pulley", &[]),
            record("48T Driven Pulley", &[]),
        ];
        let found = resolve_pulley_pair(&PairQuery {
            records: &records,
            ..PairQuery::default()
        })
        .unwrap();
        assert_eq!(found.tier, ResolutionTier::NameHeuristic);
        assert_eq!((found.drive, found.driven), (1, 2));
    }

    #[test]
    fn drive_token_must_not_match_driven() {
        let records = vec![
            record("Driven Pulley", &[]),
            record("Another Driven Pulley", &[]),
        ];
        assert!(resolve_pulley_pair(&PairQuery {
            records: &records,
            ..PairQuery::default()
        })
        .is_none());
    }

    #[test]
    fn empty_records_resolve_nothing() {
        assert!(resolve_pulley_pair(&PairQuery::default()).is_none());
    }
}
