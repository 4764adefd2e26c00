use serde::{Deserialize, Serialize};

use crate::state::{CardSummary, Enrichment, EntitySnapshot, FavoriteEntry, Theme};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    /// Step relative to the current id; rejected outside the dex range.
    Navigate(i32),
    RandomPick(u32),
    Clear,

    EntityDidLoad { token: u64, snapshot: EntitySnapshot },
    EntityDidError { token: u64, error: String },
    EnrichmentDidLoad { token: u64, enrichment: Enrichment },
    CardsDidLoad { token: u64, cards: Vec<CardSummary> },
    CardsDidError { token: u64, error: String },
    CardNext,
    CardPrev,

    FavoritesDidLoad(Vec<FavoriteEntry>),
    FavoritesDidChange(Vec<FavoriteEntry>),
    FavoriteToggle,
    FavoriteSelect(usize),
    FavoriteOpen,
    FavoriteRemove,

    ThemeDidLoad(Theme),
    ThemeToggle,

    FocusNext,
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
