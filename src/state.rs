//! Application state - single source of truth

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{DebugSection, DebugState, ron_string};

/// Lowest national dex id the navigation buttons may reach.
pub const MIN_ENTITY_ID: u32 = 1;
/// Highest national dex id the navigation buttons may reach.
pub const MAX_ENTITY_ID: u32 = 1025;

/// Lookup key for the primary API: `/pokemon/{id}` or `/pokemon/{name}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityQuery {
    Id(u32),
    Name(String),
}

impl EntityQuery {
    /// Normalizes free-form user input. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let query = input.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        match query.parse::<u32>() {
            Ok(id) if id > 0 => Some(EntityQuery::Id(id)),
            _ => Some(EntityQuery::Name(query)),
        }
    }

    /// Percent-encoded, so `?`, `#` and `/` stay part of the name.
    pub fn path_segment(&self) -> String {
        match self {
            EntityQuery::Id(id) => id.to_string(),
            EntityQuery::Name(name) => urlencoding::encode(name).into_owned(),
        }
    }
}

impl fmt::Display for EntityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityQuery::Id(id) => write!(f, "#{id}"),
            EntityQuery::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityStat {
    pub name: String,
    pub value: u16,
}

/// The record for the entity currently on screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
    pub cry_url: String,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    pub stats: Vec<EntityStat>,
    pub types: Vec<String>,
    pub moves: Vec<String>,
    pub species_url: String,
    pub encounters_url: String,
}

impl EntitySnapshot {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn favorite_entry(&self) -> FavoriteEntry {
        FavoriteEntry {
            id: self.id,
            name: self.name.clone(),
            image_url: self.sprite_url.clone(),
        }
    }
}

/// One stage of an evolution chain, leftmost branch only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species_name: String,
    pub species_id: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub name: String,
    pub image_url: String,
    pub set_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: u32,
    pub name: String,
    #[serde(rename = "img", alias = "imageUrl")]
    pub image_url: String,
}

/// Outcome of the best-effort sub-fetches that follow a successful lookup.
/// Each field fails on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub legendary: Result<bool, String>,
    pub evolution: Result<Vec<EvolutionNode>, String>,
    pub encounters: Result<Vec<String>, String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown values fall back to the light theme.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Lookup lifecycle: Idle → Loading → Displayed, Loading → Error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Displayed,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    Entity,
    Favorites,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub phase: ViewPhase,
    pub focus: FocusArea,

    /// Id of the last entity that loaded; navigation is relative to it.
    pub current_id: u32,
    /// Bumped on every lookup; results tagged with an older token are dropped.
    pub request_token: u64,
    pub pending: Option<EntityQuery>,
    /// Consumed by `Init`.
    pub startup_query: Option<EntityQuery>,

    pub snapshot: Option<EntitySnapshot>,
    pub legendary: DataResource<bool>,
    pub evolution: DataResource<Vec<EvolutionNode>>,
    pub encounters: DataResource<Vec<String>>,
    pub cards: DataResource<Vec<CardSummary>>,
    pub card_index: usize,

    pub favorites: Vec<FavoriteEntry>,
    pub favorites_selected: usize,

    pub search: SearchState,
    pub theme: Theme,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            phase: ViewPhase::Idle,
            focus: FocusArea::Entity,
            current_id: MIN_ENTITY_ID,
            request_token: 0,
            pending: None,
            startup_query: None,
            snapshot: None,
            legendary: DataResource::Empty,
            evolution: DataResource::Empty,
            encounters: DataResource::Empty,
            cards: DataResource::Empty,
            card_index: 0,
            favorites: Vec::new(),
            favorites_selected: 0,
            search: SearchState::default(),
            theme: Theme::default(),
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == ViewPhase::Loading
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.iter().any(|entry| entry.id == id)
    }

    pub fn selected_favorite(&self) -> Option<&FavoriteEntry> {
        self.favorites.get(self.favorites_selected)
    }

    pub fn clamp_favorite_selection(&mut self) {
        if self.favorites.is_empty() {
            self.favorites_selected = 0;
            if self.focus == FocusArea::Favorites {
                self.focus = FocusArea::Entity;
            }
        } else if self.favorites_selected >= self.favorites.len() {
            self.favorites_selected = self.favorites.len() - 1;
        }
    }

    /// Drops everything derived from the last lookup.
    pub fn clear_sections(&mut self) {
        self.legendary = DataResource::Empty;
        self.evolution = DataResource::Empty;
        self.encounters = DataResource::Empty;
        self.cards = DataResource::Empty;
        self.card_index = 0;
    }
}

pub fn is_valid_entity_id(id: i64) -> bool {
    (MIN_ENTITY_ID as i64..=MAX_ENTITY_ID as i64).contains(&id)
}

pub fn random_entity_id() -> u32 {
    rand::rng().random_range(MIN_ENTITY_ID..=MAX_ENTITY_ID)
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Lookup")
                .entry("phase", ron_string(&self.phase))
                .entry("current_id", ron_string(&self.current_id))
                .entry("request_token", ron_string(&self.request_token))
                .entry("pending", ron_string(&self.pending))
                .entry(
                    "entity",
                    ron_string(&self.snapshot.as_ref().map(|snapshot| snapshot.name.clone())),
                ),
            DebugSection::new("Sections")
                .entry("legendary", ron_string(&self.legendary.is_loaded()))
                .entry("evolution", ron_string(&self.evolution.is_loaded()))
                .entry("encounters", ron_string(&self.encounters.is_loaded()))
                .entry("cards", ron_string(&self.cards.is_loaded()))
                .entry("card_index", ron_string(&self.card_index)),
            DebugSection::new("Favorites")
                .entry("count", ron_string(&self.favorites.len()))
                .entry("selected", ron_string(&self.favorites_selected))
                .entry("focus", ron_string(&self.focus)),
            DebugSection::new("Status")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("theme", ron_string(&self.theme))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parse_normalizes_input() {
        assert_eq!(EntityQuery::parse("  Pikachu "), Some(EntityQuery::Name("pikachu".into())));
        assert_eq!(EntityQuery::parse("25"), Some(EntityQuery::Id(25)));
        assert_eq!(EntityQuery::parse("0"), Some(EntityQuery::Name("0".into())));
        assert_eq!(EntityQuery::parse("   "), None);
    }

    #[test]
    fn test_path_segment_encodes_names() {
        assert_eq!(EntityQuery::Id(25).path_segment(), "25");
        assert_eq!(EntityQuery::Name("mr-mime".into()).path_segment(), "mr-mime");
        assert_eq!(
            EntityQuery::Name("pikachu?shiny".into()).path_segment(),
            "pikachu%3Fshiny"
        );
        assert_eq!(EntityQuery::Name("a/b#c".into()).path_segment(), "a%2Fb%23c");
    }

    #[test]
    fn test_theme_from_stored_defaults_to_light() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("sepia"), Theme::Light);
    }

    #[test]
    fn test_random_entity_id_in_range() {
        for _ in 0..64 {
            let id = random_entity_id();
            assert!(is_valid_entity_id(id as i64));
        }
    }

    #[test]
    fn test_clamp_favorite_selection_returns_focus() {
        let mut state = AppState {
            focus: FocusArea::Favorites,
            favorites_selected: 3,
            ..Default::default()
        };
        state.clamp_favorite_selection();
        assert_eq!(state.favorites_selected, 0);
        assert_eq!(state.focus, FocusArea::Entity);
    }
}
