//! Detail view: one record plus its species entry, shaped for display.

use crate::model::{DetailRecord, Species};
use crate::source::{DetailKey, RecordSource, SourceError};

/// Number of moves shown in the detail view.
pub const MOVES_SHOWN: usize = 8;

/// Highest base stat in the games; used to scale stat bars.
pub const MAX_BASE_STAT: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBand {
    Excellent,
    Good,
    Fair,
    Low,
}

impl StatBand {
    pub fn for_value(value: u32) -> Self {
        match value {
            150.. => StatBand::Excellent,
            100..=149 => StatBand::Good,
            70..=99 => StatBand::Fair,
            _ => StatBand::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub label: String,
    pub value: u32,
    /// `value / 255 * 100`.
    pub percent: f64,
    pub band: StatBand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityLine {
    pub label: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLine {
    pub label: String,
    /// Level learned, or "TM/TR" when not learned by level-up.
    pub learned: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: u32,
    pub name: String,
    /// "Pikachu #025"
    pub heading: String,
    pub types: Vec<String>,
    pub artwork_url: Option<String>,
    pub stats: Vec<StatLine>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub base_experience: Option<u32>,
    pub abilities: Vec<AbilityLine>,
    pub moves: Vec<MoveLine>,
    pub pokedex_entry: Option<String>,
}

/// Uppercase the first character.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "special-attack" -> "Special attack". Only the first hyphen is replaced.
pub fn humanize(name: &str) -> String {
    capitalize_first(&name.replacen('-', " ", 1))
}

impl DetailView {
    pub fn build(record: &DetailRecord, species: Option<&Species>) -> Self {
        let stats = record
            .stats
            .iter()
            .map(|s| StatLine {
                label: humanize(&s.stat.name),
                value: s.base_stat,
                percent: f64::from(s.base_stat) / f64::from(MAX_BASE_STAT) * 100.0,
                band: StatBand::for_value(s.base_stat),
            })
            .collect();

        let abilities = record
            .abilities
            .iter()
            .map(|a| AbilityLine {
                label: humanize(&a.ability.name),
                hidden: a.is_hidden,
            })
            .collect();

        let moves = record
            .moves
            .iter()
            .take(MOVES_SHOWN)
            .map(|m| {
                let level = m
                    .version_group_details
                    .first()
                    .map(|d| d.level_learned_at)
                    .unwrap_or(0);
                MoveLine {
                    label: humanize(&m.move_.name),
                    learned: if level > 0 {
                        level.to_string()
                    } else {
                        "TM/TR".to_string()
                    },
                }
            })
            .collect();

        Self {
            id: record.id,
            name: record.name.clone(),
            heading: format!("{} #{:03}", capitalize_first(&record.name), record.id),
            types: record.type_names().into_iter().map(String::from).collect(),
            artwork_url: record.artwork_url().map(String::from),
            stats,
            height_m: f64::from(record.height) / 10.0,
            weight_kg: f64::from(record.weight) / 10.0,
            base_experience: record.base_experience,
            abilities,
            moves,
            pokedex_entry: species.and_then(Species::english_entry),
        }
    }
}

/// Fetch a record and its species, then build the view.
///
/// A missing record is an error; a failed species fetch only drops the
/// Pokédex entry.
pub async fn load_detail(
    source: &dyn RecordSource,
    key: &DetailKey,
) -> Result<DetailView, SourceError> {
    let record = source.fetch_detail(key).await?;
    let species = match &record.species {
        Some(link) if !link.url.is_empty() => match source.fetch_species(&link.url).await {
            Ok(species) => Some(species),
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "species fetch failed");
                None
            }
        },
        _ => None,
    };
    Ok(DetailView::build(&record, species.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AbilitySlot, FlavorText, MoveEntry, NamedResource, StatEntry, VersionGroupDetail,
    };
    use crate::source::mock::{MockSource, mock_record};

    fn pikachu() -> DetailRecord {
        let mut r = mock_record(25, "pikachu");
        r.height = 4;
        r.weight = 60;
        r.stats = vec![
            StatEntry {
                base_stat: 35,
                stat: NamedResource::new("hp"),
            },
            StatEntry {
                base_stat: 150,
                stat: NamedResource::new("special-attack"),
            },
        ];
        r.abilities = vec![AbilitySlot {
            ability: NamedResource::new("lightning-rod"),
            is_hidden: true,
        }];
        r.moves = (0..10)
            .map(|i| MoveEntry {
                move_: NamedResource::new(format!("move-{i}")),
                version_group_details: vec![VersionGroupDetail {
                    level_learned_at: if i % 2 == 0 { 0 } else { i },
                }],
            })
            .collect();
        r
    }

    #[test]
    fn heading_pads_id() {
        let view = DetailView::build(&pikachu(), None);
        assert_eq!(view.heading, "Pikachu #025");
        assert_eq!(view.height_m, 0.4);
        assert_eq!(view.weight_kg, 6.0);
    }

    #[test]
    fn stat_bands_follow_thresholds() {
        assert_eq!(StatBand::for_value(150), StatBand::Excellent);
        assert_eq!(StatBand::for_value(149), StatBand::Good);
        assert_eq!(StatBand::for_value(100), StatBand::Good);
        assert_eq!(StatBand::for_value(70), StatBand::Fair);
        assert_eq!(StatBand::for_value(69), StatBand::Low);

        let view = DetailView::build(&pikachu(), None);
        assert_eq!(view.stats[1].label, "Special attack");
        assert!((view.stats[1].percent - 58.82).abs() < 0.01);
    }

    #[test]
    fn moves_are_capped_and_labelled() {
        let view = DetailView::build(&pikachu(), None);
        assert_eq!(view.moves.len(), MOVES_SHOWN);
        assert_eq!(view.moves[0].learned, "TM/TR");
        assert_eq!(view.moves[1].learned, "1");
        assert_eq!(view.moves[1].label, "Move 1");
        assert_eq!(view.abilities[0].label, "Lightning rod");
        assert!(view.abilities[0].hidden);
    }

    #[test]
    fn humanize_only_replaces_first_hyphen() {
        assert_eq!(humanize("double-edge-x"), "Double edge-x");
        assert_eq!(humanize(""), "");
    }

    #[tokio::test]
    async fn load_detail_includes_pokedex_entry() {
        let species = Species {
            name: "pikachu".into(),
            flavor_text_entries: vec![FlavorText {
                flavor_text: "Stores\u{000c}electricity.".into(),
                language: NamedResource::new("en"),
            }],
        };
        let source = MockSource::with_catalog(&["pikachu"])
            .with_record(pikachu())
            .with_species("pikachu", species);
        let view = load_detail(&source, &DetailKey::parse("Pikachu"))
            .await
            .unwrap();
        assert_eq!(view.pokedex_entry.as_deref(), Some("Stores electricity."));
    }

    #[tokio::test]
    async fn species_failure_still_shows_record() {
        let source = MockSource::with_catalog(&["pikachu"]).with_record(pikachu());
        let view = load_detail(&source, &DetailKey::Id(25)).await.unwrap();
        assert_eq!(view.name, "pikachu");
        assert!(view.pokedex_entry.is_none());
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let source = MockSource::with_catalog(&["pikachu"]);
        let err = load_detail(&source, &DetailKey::parse("zzzztop"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
