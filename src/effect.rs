use crate::state::{EntityQuery, FavoriteEntry, Theme};

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadFavorites,
    LoadTheme,
    FetchEntity { token: u64, query: EntityQuery },
    FetchEnrichment { token: u64, species_url: String, encounters_url: String },
    FindCards { token: u64, name: String },
    ToggleFavorite { entry: FavoriteEntry },
    SaveTheme(Theme),
}
