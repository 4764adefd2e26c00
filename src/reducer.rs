use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, EntityQuery, FocusArea, ViewPhase, is_valid_entity_id};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let mut effects = vec![Effect::LoadFavorites, Effect::LoadTheme];
            if let Some(query) = state.startup_query.take() {
                effects.push(begin_lookup(state, query));
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            match EntityQuery::parse(&state.search.query) {
                Some(query) => DispatchResult::changed_with(begin_lookup(state, query)),
                None => DispatchResult::changed(),
            }
        }

        Action::Navigate(delta) => {
            let target = state.current_id as i64 + delta as i64;
            if !is_valid_entity_id(target) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_lookup(state, EntityQuery::Id(target as u32)))
        }

        Action::RandomPick(id) => {
            if !is_valid_entity_id(id as i64) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_lookup(state, EntityQuery::Id(id)))
        }

        Action::Clear => {
            // Outstanding results become stale.
            state.request_token += 1;
            state.phase = ViewPhase::Idle;
            state.pending = None;
            state.snapshot = None;
            state.search.query.clear();
            state.search.active = false;
            state.message = None;
            state.clear_sections();
            DispatchResult::changed()
        }

        Action::EntityDidLoad { token, snapshot } => {
            if token != state.request_token {
                return DispatchResult::unchanged();
            }
            state.phase = ViewPhase::Displayed;
            state.pending = None;
            state.current_id = snapshot.id;
            state.message = None;
            state.legendary = DataResource::Loading;
            state.evolution = DataResource::Loading;
            state.encounters = DataResource::Loading;
            state.cards = DataResource::Loading;
            state.card_index = 0;

            let effects = vec![
                Effect::FetchEnrichment {
                    token,
                    species_url: snapshot.species_url.clone(),
                    encounters_url: snapshot.encounters_url.clone(),
                },
                Effect::FindCards {
                    token,
                    name: snapshot.name.clone(),
                },
            ];
            state.snapshot = Some(snapshot);
            DispatchResult::changed_with_many(effects)
        }

        Action::EntityDidError { token, error } => {
            if token != state.request_token {
                return DispatchResult::unchanged();
            }
            state.phase = ViewPhase::Error;
            state.pending = None;
            state.snapshot = None;
            state.message = Some(error);
            state.clear_sections();
            DispatchResult::changed()
        }

        Action::EnrichmentDidLoad { token, enrichment } => {
            if !accepts_section_result(state, token) {
                return DispatchResult::unchanged();
            }
            state.legendary = resource_from(enrichment.legendary);
            state.evolution = resource_from(enrichment.evolution);
            state.encounters = resource_from(enrichment.encounters);
            DispatchResult::changed()
        }

        Action::CardsDidLoad { token, cards } => {
            if !accepts_section_result(state, token) {
                return DispatchResult::unchanged();
            }
            state.cards = DataResource::Loaded(cards);
            state.card_index = 0;
            DispatchResult::changed()
        }

        // Failures render exactly like an empty result.
        Action::CardsDidError { token, error: _ } => {
            if !accepts_section_result(state, token) {
                return DispatchResult::unchanged();
            }
            state.cards = DataResource::Loaded(Vec::new());
            state.card_index = 0;
            DispatchResult::changed()
        }

        Action::CardNext => cycle_card(state, 1),
        Action::CardPrev => cycle_card(state, -1),

        Action::FavoritesDidLoad(entries) | Action::FavoritesDidChange(entries) => {
            state.favorites = entries;
            state.clamp_favorite_selection();
            DispatchResult::changed()
        }

        Action::FavoriteToggle => {
            if state.phase != ViewPhase::Displayed {
                return DispatchResult::unchanged();
            }
            let Some(snapshot) = state.snapshot.as_ref() else {
                return DispatchResult::unchanged();
            };
            DispatchResult::changed_with(Effect::ToggleFavorite {
                entry: snapshot.favorite_entry(),
            })
        }

        Action::FavoriteSelect(index) => {
            if index >= state.favorites.len() || index == state.favorites_selected {
                return DispatchResult::unchanged();
            }
            state.favorites_selected = index;
            DispatchResult::changed()
        }

        Action::FavoriteOpen => {
            let Some(entry) = state.selected_favorite() else {
                return DispatchResult::unchanged();
            };
            let query = EntityQuery::Id(entry.id);
            DispatchResult::changed_with(begin_lookup(state, query))
        }

        Action::FavoriteRemove => {
            let Some(entry) = state.selected_favorite().cloned() else {
                return DispatchResult::unchanged();
            };
            DispatchResult::changed_with(Effect::ToggleFavorite { entry })
        }

        Action::ThemeDidLoad(theme) => {
            if state.theme == theme {
                return DispatchResult::unchanged();
            }
            state.theme = theme;
            DispatchResult::changed()
        }

        Action::ThemeToggle => {
            state.theme = state.theme.toggle();
            DispatchResult::changed_with(Effect::SaveTheme(state.theme))
        }

        Action::FocusNext => {
            if state.search.active || state.favorites.is_empty() {
                return DispatchResult::unchanged();
            }
            state.focus = match state.focus {
                FocusArea::Entity => FocusArea::Favorites,
                FocusArea::Favorites => FocusArea::Entity,
            };
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            if !state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Enters `Loading` and issues a fresh request token. The previous snapshot
/// is kept until a newer one replaces it.
fn begin_lookup(state: &mut AppState, query: EntityQuery) -> Effect {
    state.request_token += 1;
    state.phase = ViewPhase::Loading;
    state.pending = Some(query.clone());
    state.message = None;
    state.tick = 0;
    Effect::FetchEntity {
        token: state.request_token,
        query,
    }
}

fn accepts_section_result(state: &AppState, token: u64) -> bool {
    token == state.request_token && state.phase == ViewPhase::Displayed
}

fn resource_from<T>(result: Result<T, String>) -> DataResource<T> {
    match result {
        Ok(value) => DataResource::Loaded(value),
        Err(error) => DataResource::Failed(error),
    }
}

fn cycle_card(state: &mut AppState, step: i64) -> DispatchResult<Effect> {
    let Some(cards) = state.cards.data() else {
        return DispatchResult::unchanged();
    };
    let count = cards.len().min(crate::cards::MAX_CARDS);
    if count < 2 {
        return DispatchResult::unchanged();
    }
    let next = (state.card_index as i64 + step).rem_euclid(count as i64) as usize;
    state.card_index = next;
    DispatchResult::changed()
}
