//! Wire types for the catalog API.
//!
//! Only the fields the views read are modelled; everything else in the
//! upstream JSON is ignored by serde. List fields default to empty so that
//! sparse records still decode.

use serde::{Deserialize, Serialize};

/// One catalog entry as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub name: String,
    pub url: String,
}

/// A page of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Total number of records in the catalog, not in this page.
    pub count: usize,
    #[serde(default)]
    pub results: Vec<RecordRef>,
}

/// A `{name, url}` link to another API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }
}

/// Full record for a single Pokémon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    #[serde(default)]
    pub height: u32,
    /// Hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub species: Option<NamedResource>,
}

impl DetailRecord {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.kind.name.as_str()).collect()
    }

    /// Official artwork URL, falling back to the default front sprite.
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub move_: NamedResource,
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionGroupDetail {
    #[serde(default)]
    pub level_learned_at: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Species record; only the Pokédex flavor text is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

impl Species {
    /// First English flavor text, with form feeds turned into spaces.
    pub fn english_entry(&self) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|e| e.language.name == "en")
            .map(|e| e.flavor_text.replace('\u{000c}', " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "order": 35,
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "abilities": [
            {"ability": {"name": "static", "url": ""}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": ""}, "is_hidden": true, "slot": 3}
        ],
        "stats": [{"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}}],
        "moves": [{"move": {"name": "mega-punch", "url": ""},
                   "version_group_details": [{"level_learned_at": 0, "move_learn_method": {"name": "machine", "url": ""}}]}],
        "sprites": {
            "front_default": "https://img/front/25.png",
            "other": {"official-artwork": {"front_default": "https://img/art/25.png"}}
        },
        "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"}
    }"#;

    #[test]
    fn decodes_detail_and_ignores_unknown_fields() {
        let record: DetailRecord = serde_json::from_str(PIKACHU).unwrap();
        assert_eq!(record.id, 25);
        assert_eq!(record.type_names(), vec!["electric"]);
        assert!(record.abilities[1].is_hidden);
        assert_eq!(record.moves[0].move_.name, "mega-punch");
        assert_eq!(record.artwork_url(), Some("https://img/art/25.png"));
        assert_eq!(record.species.unwrap().name, "pikachu");
    }

    #[test]
    fn sparse_detail_decodes_with_defaults() {
        let record: DetailRecord = serde_json::from_str(r#"{"id": 1, "name": "bulbasaur"}"#).unwrap();
        assert!(record.types.is_empty());
        assert_eq!(record.artwork_url(), None);
        assert_eq!(record.base_experience, None);
    }

    #[test]
    fn artwork_falls_back_to_front_sprite() {
        let mut record: DetailRecord = serde_json::from_str(PIKACHU).unwrap();
        record.sprites.other = None;
        assert_eq!(record.artwork_url(), Some("https://img/front/25.png"));
    }

    #[test]
    fn english_entry_replaces_form_feeds() {
        let species: Species = serde_json::from_str(
            r#"{"name": "pikachu", "flavor_text_entries": [
                {"flavor_text": "ピカチュウ", "language": {"name": "ja", "url": ""}},
                {"flavor_text": "When several of\fthese POKéMON gather", "language": {"name": "en", "url": ""}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            species.english_entry().as_deref(),
            Some("When several of these POKéMON gather")
        );
    }

    #[test]
    fn listing_page_decodes() {
        let page: RecordPage = serde_json::from_str(
            r#"{"count": 1302, "next": null, "previous": null,
                "results": [{"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 1302);
        assert_eq!(page.results[0].name, "bulbasaur");
    }
}
