pub mod card_carousel;
pub mod entity_card;
pub mod evolution_strip;
pub mod favorites_panel;
pub mod lookup_screen;
pub mod search_bar;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_carousel::{CardCarousel, CardCarouselProps};
pub use entity_card::{EntityCard, EntityCardProps};
pub use evolution_strip::{BadgeList, BadgeListProps, EvolutionStrip, EvolutionStripProps};
pub use favorites_panel::{FavoritesPanel, FavoritesPanelProps};
pub use lookup_screen::{LookupScreen, LookupScreenProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use theme::Palette;
