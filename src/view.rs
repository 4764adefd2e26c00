//! Pure mapping from `AppState` to what the components draw.
//!
//! Nothing here touches the terminal, so every derived value (stat bar
//! widths, palette lookups, section visibility) is unit-testable.

use tui_dispatch::DataResource;

use crate::cards::{MAX_CARDS, capitalize_first};
use crate::state::{
    AppState, CardSummary, EntitySnapshot, EvolutionNode, FavoriteEntry, ViewPhase,
};

/// Stat value that fills a bar completely.
pub const STAT_MAX: u16 = 200;
pub const MOVE_LIMIT: usize = 8;
pub const ENCOUNTER_LIMIT: usize = 8;

pub const NOT_FOUND_MESSAGE: &str = "Pokémon not found.";
pub const UNAVAILABLE: &str = "Unavailable";
pub const NO_ENCOUNTERS: &str = "No encounters";
pub const NO_CARDS: &str = "No TCG cards found";
pub const IDLE_HINT: &str = "Press / to search by name or number";
pub const EVOLUTION_SEPARATOR: &str = "→";

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

/// Background colour keyed by primary type. Unknown types are white.
pub fn type_color(type_name: &str) -> Rgb {
    match type_name {
        "normal" => Rgb(0xA8, 0xA7, 0x7A),
        "fire" => Rgb(0xEE, 0x81, 0x30),
        "water" => Rgb(0x63, 0x90, 0xF0),
        "electric" => Rgb(0xF7, 0xD0, 0x2C),
        "grass" => Rgb(0x7A, 0xC7, 0x4C),
        "ice" => Rgb(0x96, 0xD9, 0xD6),
        "fighting" => Rgb(0xC2, 0x2E, 0x28),
        "poison" => Rgb(0xA3, 0x3E, 0xA1),
        "ground" => Rgb(0xE2, 0xBF, 0x65),
        "flying" => Rgb(0xA9, 0x8F, 0xF3),
        "psychic" => Rgb(0xF9, 0x55, 0x87),
        "bug" => Rgb(0xA6, 0xB9, 0x1A),
        "rock" => Rgb(0xB6, 0xA1, 0x36),
        "ghost" => Rgb(0x73, 0x57, 0x97),
        "dragon" => Rgb(0x6F, 0x35, 0xFC),
        "dark" => Rgb(0x70, 0x57, 0x46),
        "steel" => Rgb(0xB7, 0xB7, 0xCE),
        "fairy" => Rgb(0xD6, 0x85, 0xAD),
        _ => WHITE,
    }
}

/// Bar fill in percent, capped at 100.
pub fn stat_percent(value: u16) -> f64 {
    (value as f64 / STAT_MAX as f64 * 100.0).min(100.0)
}

pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Atk".to_string(),
        "special-defense" => "Sp. Def".to_string(),
        "speed" => "Speed".to_string(),
        other => other.to_string(),
    }
}

/// `viridian-forest-area` -> `viridian forest area`.
pub fn badge_text(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Decimetres or hectograms to one-decimal metric units.
pub fn tenths(value: u16) -> String {
    format!("{:.1}", value as f64 / 10.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatView {
    pub label: String,
    pub value: u16,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub id: u32,
    pub title: String,
    pub types: String,
    pub height_m: String,
    pub weight_kg: String,
    pub sprite_url: String,
    pub cry_url: String,
    pub stats: Vec<StatView>,
    pub is_favorite: bool,
    pub legendary: bool,
    pub background: Rgb,
}

impl EntityView {
    pub fn from_snapshot(snapshot: &EntitySnapshot, is_favorite: bool, legendary: bool) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.name.to_uppercase(),
            types: snapshot.types.join(", "),
            height_m: tenths(snapshot.height),
            weight_kg: tenths(snapshot.weight),
            sprite_url: snapshot.sprite_url.clone(),
            cry_url: snapshot.cry_url.clone(),
            stats: snapshot
                .stats
                .iter()
                .map(|stat| StatView {
                    label: stat_label(&stat.name),
                    value: stat.value,
                    percent: stat_percent(stat.value),
                })
                .collect(),
            is_favorite,
            legendary,
            background: snapshot.primary_type().map(type_color).unwrap_or(WHITE),
        }
    }
}

/// How a dependent section should be drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionView<T> {
    Hidden,
    Loading,
    Placeholder(&'static str),
    Ready(T),
}

impl<T> SectionView<T> {
    pub fn is_hidden(&self) -> bool {
        matches!(self, SectionView::Hidden)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvolutionStep {
    /// `id` is `None` when the chain carried no usable species id.
    Stage { name: String, id: Option<u32> },
    Separator,
}

/// Nodes left to right with a separator between consecutive stages.
pub fn evolution_steps(nodes: &[EvolutionNode]) -> Vec<EvolutionStep> {
    let mut steps = Vec::with_capacity(nodes.len() * 2);
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 {
            steps.push(EvolutionStep::Separator);
        }
        steps.push(EvolutionStep::Stage {
            name: capitalize_first(&node.species_name),
            id: (node.species_id > 0).then_some(node.species_id),
        });
    }
    steps
}

pub fn encounter_badges(areas: &[String]) -> SectionView<Vec<String>> {
    if areas.is_empty() {
        return SectionView::Placeholder(NO_ENCOUNTERS);
    }
    SectionView::Ready(
        areas
            .iter()
            .take(ENCOUNTER_LIMIT)
            .map(|area| badge_text(area))
            .collect(),
    )
}

pub fn move_badges(moves: &[String]) -> Vec<String> {
    moves.iter().take(MOVE_LIMIT).map(|m| badge_text(m)).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardsView {
    pub cards: Vec<CardSummary>,
    pub index: usize,
}

impl CardsView {
    pub fn current(&self) -> Option<&CardSummary> {
        self.cards.get(self.index)
    }
}

pub fn cards_view(cards: &[CardSummary], index: usize) -> SectionView<CardsView> {
    if cards.is_empty() {
        return SectionView::Placeholder(NO_CARDS);
    }
    let cards: Vec<CardSummary> = cards.iter().take(MAX_CARDS).cloned().collect();
    let index = index.min(cards.len() - 1);
    SectionView::Ready(CardsView { cards, index })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FavoriteView {
    pub id: u32,
    pub label: String,
}

pub fn favorite_views(entries: &[FavoriteEntry]) -> Vec<FavoriteView> {
    entries
        .iter()
        .map(|entry| FavoriteView {
            id: entry.id,
            label: format!("#{:<4} {}", entry.id, capitalize_first(&entry.name)),
        })
        .collect()
}

fn section<T, U>(
    resource: &DataResource<T>,
    ready: impl FnOnce(&T) -> SectionView<U>,
) -> SectionView<U> {
    match resource {
        DataResource::Empty => SectionView::Hidden,
        DataResource::Loading => SectionView::Loading,
        DataResource::Failed(_) => SectionView::Placeholder(UNAVAILABLE),
        DataResource::Loaded(value) => ready(value),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    pub phase: ViewPhase,
    pub spinner: Option<char>,
    pub message: Option<String>,
    pub entity: Option<EntityView>,
    pub evolution: SectionView<Vec<EvolutionStep>>,
    pub encounters: SectionView<Vec<String>>,
    pub moves: SectionView<Vec<String>>,
    pub cards: SectionView<CardsView>,
}

pub fn screen(state: &AppState) -> Screen {
    let hidden = |phase, spinner, message| Screen {
        phase,
        spinner,
        message,
        entity: None,
        evolution: SectionView::Hidden,
        encounters: SectionView::Hidden,
        moves: SectionView::Hidden,
        cards: SectionView::Hidden,
    };

    match state.phase {
        ViewPhase::Idle => hidden(ViewPhase::Idle, None, Some(IDLE_HINT.to_string())),
        ViewPhase::Loading => {
            let frame = SPINNER_FRAMES[(state.tick % SPINNER_FRAMES.len() as u64) as usize];
            let message = state.pending.as_ref().map(|query| format!("Loading {query}..."));
            hidden(ViewPhase::Loading, Some(frame), message)
        }
        ViewPhase::Error => hidden(
            ViewPhase::Error,
            None,
            Some(
                state
                    .message
                    .clone()
                    .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
            ),
        ),
        ViewPhase::Displayed => {
            let Some(snapshot) = state.snapshot.as_ref() else {
                return hidden(ViewPhase::Idle, None, Some(IDLE_HINT.to_string()));
            };
            let legendary = matches!(state.legendary, DataResource::Loaded(true));
            Screen {
                phase: ViewPhase::Displayed,
                spinner: None,
                message: None,
                entity: Some(EntityView::from_snapshot(
                    snapshot,
                    state.is_favorite(snapshot.id),
                    legendary,
                )),
                evolution: section(&state.evolution, |nodes| {
                    SectionView::Ready(evolution_steps(nodes))
                }),
                encounters: section(&state.encounters, |areas| encounter_badges(areas)),
                moves: SectionView::Ready(move_badges(&snapshot.moves)),
                cards: section(&state.cards, |cards| cards_view(cards, state.card_index)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityQuery, EntityStat};
    use pretty_assertions::assert_eq;

    fn node(name: &str, id: u32) -> EvolutionNode {
        EvolutionNode {
            species_name: name.into(),
            species_id: id,
        }
    }

    fn bulbasaur() -> EntitySnapshot {
        EntitySnapshot {
            id: 1,
            name: "bulbasaur".into(),
            sprite_url: "https://sprites/1.png".into(),
            cry_url: "https://cries/1.ogg".into(),
            height: 7,
            weight: 69,
            stats: vec![
                EntityStat {
                    name: "hp".into(),
                    value: 45,
                },
                EntityStat {
                    name: "special-attack".into(),
                    value: 255,
                },
            ],
            types: vec!["grass".into(), "poison".into()],
            moves: (0..12).map(|i| format!("move-number-{i}")).collect(),
            species_url: String::new(),
            encounters_url: String::new(),
        }
    }

    #[test]
    fn test_stat_percent_caps_at_full() {
        assert_eq!(stat_percent(100), 50.0);
        assert_eq!(stat_percent(200), 100.0);
        assert_eq!(stat_percent(255), 100.0);
        assert_eq!(stat_percent(0), 0.0);
    }

    #[test]
    fn test_type_palette_default_white() {
        assert_eq!(type_color("grass"), Rgb(0x7A, 0xC7, 0x4C));
        assert_eq!(type_color("fairy"), Rgb(0xD6, 0x85, 0xAD));
        assert_eq!(type_color("shadow"), WHITE);
    }

    #[test]
    fn test_three_stage_chain_has_two_separators() {
        let steps = evolution_steps(&[
            node("bulbasaur", 1),
            node("ivysaur", 2),
            node("venusaur", 3),
        ]);
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps
                .iter()
                .filter(|step| **step == EvolutionStep::Separator)
                .count(),
            2
        );
        assert_eq!(
            steps[0],
            EvolutionStep::Stage {
                name: "Bulbasaur".into(),
                id: Some(1)
            }
        );
    }

    #[test]
    fn test_unknown_species_id_is_omitted() {
        let steps = evolution_steps(&[node("porygon", 0)]);
        assert_eq!(
            steps,
            vec![EvolutionStep::Stage {
                name: "Porygon".into(),
                id: None
            }]
        );
    }

    #[test]
    fn test_single_stage_has_no_separator() {
        let steps = evolution_steps(&[node("tauros", 128)]);
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_encounters_limit_and_placeholder() {
        let areas: Vec<String> = (0..10).map(|i| format!("route-{i}-area")).collect();
        match encounter_badges(&areas) {
            SectionView::Ready(badges) => {
                assert_eq!(badges.len(), ENCOUNTER_LIMIT);
                assert_eq!(badges[0], "route 0 area");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            encounter_badges(&[]),
            SectionView::Placeholder(NO_ENCOUNTERS)
        );
    }

    #[test]
    fn test_zero_cards_is_no_cards_state() {
        assert_eq!(cards_view(&[], 0), SectionView::Placeholder(NO_CARDS));
    }

    #[test]
    fn test_entity_view_derivations() {
        let view = EntityView::from_snapshot(&bulbasaur(), true, false);
        assert_eq!(view.title, "BULBASAUR");
        assert_eq!(view.types, "grass, poison");
        assert_eq!(view.height_m, "0.7");
        assert_eq!(view.weight_kg, "6.9");
        assert_eq!(view.background, type_color("grass"));
        assert_eq!(view.stats[1].label, "Sp. Atk");
        assert_eq!(view.stats[1].percent, 100.0);
        assert!(view.is_favorite);
    }

    #[test]
    fn test_loading_screen_hides_content() {
        let state = AppState {
            phase: ViewPhase::Loading,
            pending: Some(EntityQuery::Id(4)),
            snapshot: Some(bulbasaur()),
            tick: 1,
            ..Default::default()
        };
        let screen = screen(&state);
        assert_eq!(screen.spinner, Some('/'));
        assert!(screen.entity.is_none());
        assert!(screen.cards.is_hidden());
        assert_eq!(screen.message.as_deref(), Some("Loading #4..."));
    }

    #[test]
    fn test_error_screen_shows_message_only() {
        let state = AppState {
            phase: ViewPhase::Error,
            message: Some(NOT_FOUND_MESSAGE.into()),
            ..Default::default()
        };
        let screen = screen(&state);
        assert_eq!(screen.message.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert!(screen.spinner.is_none());
        assert!(screen.evolution.is_hidden());
        assert!(screen.encounters.is_hidden());
        assert!(screen.moves.is_hidden());
        assert!(screen.cards.is_hidden());
    }

    #[test]
    fn test_displayed_screen_sections() {
        let state = AppState {
            phase: ViewPhase::Displayed,
            snapshot: Some(bulbasaur()),
            legendary: DataResource::Loaded(false),
            evolution: DataResource::Failed("down".into()),
            encounters: DataResource::Loading,
            cards: DataResource::Loaded(Vec::new()),
            ..Default::default()
        };
        let screen = screen(&state);
        assert_eq!(screen.evolution, SectionView::Placeholder(UNAVAILABLE));
        assert_eq!(screen.encounters, SectionView::Loading);
        assert_eq!(screen.cards, SectionView::Placeholder(NO_CARDS));
        match screen.moves {
            SectionView::Ready(moves) => assert_eq!(moves.len(), MOVE_LIMIT),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_favorite_labels() {
        let views = favorite_views(&[FavoriteEntry {
            id: 25,
            name: "pikachu".into(),
            image_url: String::new(),
        }]);
        assert_eq!(views[0].label, "#25   Pikachu");
    }
}
