//! pokelookup - Pokémon lookup TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokelookup::action::Action;
use pokelookup::api::{API_BASE, EntityFetcher};
use pokelookup::cards::{CardMatcher, TCG_API_BASE};
use pokelookup::components::lookup_screen::screen_layout;
use pokelookup::components::{
    Component, FavoritesPanel, FavoritesPanelProps, LookupScreen, LookupScreenProps, Palette,
    SearchBar, SearchBarProps,
};
use pokelookup::config::{DEFAULT_TIMEOUT_SECS, LookupConfig, default_data_dir};
use pokelookup::effect::Effect;
use pokelookup::favorites::FavoritesStore;
use pokelookup::logging;
use pokelookup::reducer::reducer;
use pokelookup::state::{AppState, EntityQuery, FocusArea};
use pokelookup::storage::FileStorage;
use pokelookup::view::{NOT_FOUND_MESSAGE, favorite_views};

const TICK_MS: u64 = 120;

/// Look up Pokémon by name or number, browse evolutions and TCG cards
#[derive(Parser, Debug)]
#[command(name = "pokelookup")]
#[command(about = "Pokémon lookup TUI with favorites and trading cards")]
struct Args {
    /// Name or national dex number to show on startup
    #[arg(long, short)]
    query: Option<String>,

    #[arg(long, default_value = API_BASE)]
    api_base: String,

    #[arg(long, default_value = TCG_API_BASE)]
    tcg_base: String,

    /// Optional key for the trading card API
    #[arg(long, env = "POKEMONTCG_API_KEY")]
    tcg_api_key: Option<String>,

    /// Where favorites and the theme are stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn config(&self) -> LookupConfig {
        LookupConfig {
            api_base: self.api_base.clone(),
            tcg_base: self.tcg_base.clone(),
            tcg_api_key: self.tcg_api_key.clone().filter(|key| !key.trim().is_empty()),
            data_dir: self.data_dir.clone().unwrap_or_else(default_data_dir),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Long-lived handles shared by effect tasks.
struct Services {
    fetcher: EntityFetcher,
    cards: CardMatcher,
    favorites: Mutex<FavoritesStore>,
}

impl Services {
    fn new(config: &LookupConfig) -> io::Result<Self> {
        let client = config
            .http_client()
            .map_err(|error| io::Error::other(format!("http client: {error}")))?;
        Ok(Self {
            fetcher: EntityFetcher::new(client.clone(), config.api_base.clone()),
            cards: CardMatcher::new(client, config.tcg_base.clone(), config.tcg_api_key.clone()),
            favorites: Mutex::new(FavoritesStore::new(FileStorage::new(config.storage_path()))),
        })
    }

    fn favorites(&self) -> MutexGuard<'_, FavoritesStore> {
        self.favorites.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum LookupComponentId {
    Screen,
    Search,
    Favorites,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupContext {
    Main,
    Search,
    Favorites,
}

impl EventRoutingState<LookupComponentId, LookupContext> for AppState {
    fn focused(&self) -> Option<LookupComponentId> {
        if self.search.active {
            return Some(LookupComponentId::Search);
        }
        match self.focus {
            FocusArea::Entity => Some(LookupComponentId::Screen),
            FocusArea::Favorites => Some(LookupComponentId::Favorites),
        }
    }

    fn modal(&self) -> Option<LookupComponentId> {
        if self.search.active {
            Some(LookupComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: LookupComponentId) -> LookupContext {
        match id {
            LookupComponentId::Screen => LookupContext::Main,
            LookupComponentId::Search => LookupContext::Search,
            LookupComponentId::Favorites => LookupContext::Favorites,
        }
    }

    fn default_context(&self) -> LookupContext {
        LookupContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let config = args.config();
    info!(api = %config.api_base, storage = %config.storage_path().display(), "starting");
    let services = Arc::new(Services::new(&config)?);
    let startup_query = args.query.as_deref().and_then(EntityQuery::parse);

    let debug = DebugSession::new(args.debug);

    let mut state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    state.startup_query = startup_query;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct LookupUi {
    screen: LookupScreen,
    search: SearchBar,
    favorites: FavoritesPanel,
}

impl LookupUi {
    fn new() -> Self {
        Self {
            screen: LookupScreen,
            search: SearchBar,
            favorites: FavoritesPanel::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<LookupComponentId>,
    ) {
        let layout = screen_layout(area);
        let palette = Palette::for_theme(state.theme);
        event_ctx.set_component_area(LookupComponentId::Screen, layout.body);
        event_ctx.set_component_area(LookupComponentId::Search, layout.search);
        event_ctx.set_component_area(LookupComponentId::Favorites, layout.favorites);

        self.screen.render(
            frame,
            area,
            LookupScreenProps {
                state,
                is_focused: render_ctx.is_focused() && Self::screen_focused(state),
            },
        );
        self.search.render(
            frame,
            layout.search,
            SearchBarProps {
                query: &state.search.query,
                active: state.search.active,
                is_focused: state.search.active,
                palette,
            },
        );
        let favorites = favorite_views(&state.favorites);
        self.favorites.render(
            frame,
            layout.favorites,
            FavoritesPanelProps {
                favorites: &favorites,
                selected: state.favorites_selected,
                is_focused: !state.search.active && state.focus == FocusArea::Favorites,
                palette,
            },
        );
    }

    fn screen_focused(state: &AppState) -> bool {
        !state.search.active && state.focus == FocusArea::Entity
    }

    fn handle_screen_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = LookupScreenProps {
            state,
            is_focused: Self::screen_focused(state),
        };
        let actions: Vec<_> = self.screen.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            query: &state.search.query,
            active: state.search.active,
            is_focused: true,
            palette: Palette::for_theme(state.theme),
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        // The search bar is modal: it swallows every key while open.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_favorites_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let favorites = favorite_views(&state.favorites);
        let props = FavoritesPanelProps {
            favorites: &favorites,
            selected: state.favorites_selected,
            is_focused: state.focus == FocusArea::Favorites,
            palette: Palette::for_theme(state.theme),
        };
        let actions: Vec<_> = self
            .favorites
            .handle_event(event, props)
            .into_iter()
            .collect();
        respond(actions)
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Arc<Services>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(LookupUi::new()));
    let mut bus: EventBus<AppState, Action, LookupComponentId, LookupContext> = EventBus::new();
    let keybindings: Keybindings<LookupContext> = Keybindings::new();

    let ui_screen = Rc::clone(&ui);
    bus.register(LookupComponentId::Screen, move |event, state| {
        ui_screen
            .borrow_mut()
            .handle_screen_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(LookupComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_favorites = Rc::clone(&ui);
    bus.register(LookupComponentId::Favorites, move |event, state| {
        ui_favorites
            .borrow_mut()
            .handle_favorites_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, services.clone()),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: Arc<Services>) {
    match effect {
        Effect::LoadFavorites => {
            ctx.tasks().spawn(TaskKey::new("favorites"), async move {
                Action::FavoritesDidLoad(services.favorites().list())
            });
        }
        Effect::LoadTheme => {
            ctx.tasks().spawn(TaskKey::new("theme"), async move {
                Action::ThemeDidLoad(services.favorites().theme())
            });
        }
        Effect::FetchEntity { token, query } => {
            // Replacing the keyed task drops the superseded request.
            ctx.tasks().spawn(TaskKey::new("entity"), async move {
                match services.fetcher.fetch(&query).await {
                    Ok(snapshot) => Action::EntityDidLoad { token, snapshot },
                    Err(_) => Action::EntityDidError {
                        token,
                        error: NOT_FOUND_MESSAGE.to_string(),
                    },
                }
            });
        }
        Effect::FetchEnrichment {
            token,
            species_url,
            encounters_url,
        } => {
            ctx.tasks().spawn(TaskKey::new("enrichment"), async move {
                let enrichment = services
                    .fetcher
                    .fetch_enrichment(&species_url, &encounters_url)
                    .await;
                Action::EnrichmentDidLoad { token, enrichment }
            });
        }
        Effect::FindCards { token, name } => {
            ctx.tasks().spawn(TaskKey::new("cards"), async move {
                match services.cards.find_cards(&name).await {
                    Ok(cards) => Action::CardsDidLoad { token, cards },
                    Err(error) => {
                        warn!(%name, %error, "card search failed");
                        Action::CardsDidError {
                            token,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        // Storage writes happen here, in dispatch order.
        Effect::ToggleFavorite { entry } => {
            let entries = {
                let mut favorites = services.favorites();
                let added = !favorites.contains(entry.id);
                let entries = favorites.toggle(entry.id, &entry.name, &entry.image_url);
                info!(id = entry.id, added, "favorite toggled");
                entries
            };
            ctx.tasks().spawn(TaskKey::new("favorites"), async move {
                Action::FavoritesDidChange(entries)
            });
        }
        Effect::SaveTheme(theme) => {
            services.favorites().set_theme(theme);
            ctx.tasks()
                .spawn(TaskKey::new("theme"), async move { Action::ThemeDidLoad(theme) });
        }
    }
}
