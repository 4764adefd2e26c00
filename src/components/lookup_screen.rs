use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::theme::BRAND_RED;
use super::{
    BadgeList, BadgeListProps, CardCarousel, CardCarouselProps, Component, EntityCard,
    EntityCardProps, EvolutionStrip, EvolutionStripProps, Palette,
};
use crate::action::Action;
use crate::state::{AppState, FocusArea, ViewPhase, random_entity_id};
use crate::view::{self, Screen};

/// Regions of the full terminal. The search bar and favorites panel are
/// separate routing targets, so their areas are exposed to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    pub search: Rect,
    pub body: Rect,
    pub favorites: Rect,
    pub status: Rect,
}

const FAVORITES_WIDTH: u16 = 28;

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::vertical([
        Constraint::Length(3), // Search
        Constraint::Min(1),    // Body + favorites
        Constraint::Length(1), // Help bar
    ])
    .split(area);
    let columns =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(FAVORITES_WIDTH)]).split(rows[1]);

    ScreenLayout {
        search: rows[0],
        body: columns[0],
        favorites: columns[1],
        status: rows[2],
    }
}

/// Main lookup view: entity card, dependent sections and the help bar.
#[derive(Default)]
pub struct LookupScreen;

pub struct LookupScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Component<Action> for LookupScreen {
    type Props<'a> = LookupScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => Some(Action::SearchStart),
                KeyCode::Char('h') | KeyCode::Left => Some(Action::Navigate(-1)),
                KeyCode::Char('l') | KeyCode::Right => Some(Action::Navigate(1)),
                KeyCode::Char('x') => Some(Action::RandomPick(random_entity_id())),
                KeyCode::Char('f') => Some(Action::FavoriteToggle),
                KeyCode::Char('c') => Some(Action::Clear),
                KeyCode::Char('t') => Some(Action::ThemeToggle),
                KeyCode::Char('[') => Some(Action::CardPrev),
                KeyCode::Char(']') => Some(Action::CardNext),
                KeyCode::Tab => Some(Action::FocusNext),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let palette = Palette::for_theme(state.theme);
        let layout = screen_layout(area);

        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg).fg(palette.text)),
            layout.body,
        );

        let screen = view::screen(state);
        match screen.phase {
            ViewPhase::Displayed => render_displayed(frame, layout.body, &screen, palette),
            _ => render_message(frame, layout.body, &screen, palette),
        }

        render_status(frame, layout.status, state);
    }
}

fn render_message(frame: &mut Frame, area: Rect, screen: &Screen, palette: Palette) {
    let [center] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(area);

    let text = screen.message.clone().unwrap_or_default();
    let line = match (screen.phase, screen.spinner) {
        (ViewPhase::Error, _) => Line::from(Span::styled(
            text,
            Style::default().fg(BRAND_RED).add_modifier(Modifier::BOLD),
        )),
        (_, Some(frame_char)) => Line::from(vec![
            Span::styled(format!("{frame_char} "), palette.accent()),
            Span::raw(text),
        ]),
        _ => Line::from(Span::styled(text, palette.dim())),
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), line])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        center,
    );
}

fn render_displayed(frame: &mut Frame, area: Rect, screen: &Screen, palette: Palette) {
    let Some(entity) = screen.entity.as_ref() else {
        return;
    };
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    EntityCard.render(frame, columns[0], EntityCardProps { view: entity });

    let sections = Layout::vertical([
        Constraint::Length(4), // Evolutions
        Constraint::Length(5), // Encounters
        Constraint::Length(5), // Moves
        Constraint::Min(6),    // Cards
    ])
    .split(columns[1]);

    EvolutionStrip.render(
        frame,
        sections[0],
        EvolutionStripProps {
            section: &screen.evolution,
            palette,
        },
    );
    BadgeList.render(
        frame,
        sections[1],
        BadgeListProps {
            title: " Encounters ",
            section: &screen.encounters,
            badge: Color::Cyan,
            palette,
        },
    );
    BadgeList.render(
        frame,
        sections[2],
        BadgeListProps {
            title: " Moves ",
            section: &screen.moves,
            badge: Color::Green,
            palette,
        },
    );
    if !screen.cards.is_hidden() {
        CardCarousel.render(
            frame,
            sections[3],
            CardCarouselProps {
                section: &screen.cards,
                palette,
            },
        );
    }
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match (state.search.active, state.focus) {
        (true, _) => vec![
            StatusBarHint::new("enter", "look up"),
            StatusBarHint::new("esc", "cancel"),
        ],
        (false, FocusArea::Favorites) => vec![
            StatusBarHint::new("enter", "open"),
            StatusBarHint::new("d", "remove"),
            StatusBarHint::new("tab", "back"),
            StatusBarHint::new("q", "quit"),
        ],
        (false, FocusArea::Entity) => vec![
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("h/l", "prev/next"),
            StatusBarHint::new("x", "random"),
            StatusBarHint::new("f", "favorite"),
            StatusBarHint::new("[/]", "cards"),
            StatusBarHint::new("c", "clear"),
            StatusBarHint::new("t", "theme"),
            StatusBarHint::new("tab", "favorites"),
            StatusBarHint::new("q", "quit"),
        ],
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MAX_ENTITY_ID, MIN_ENTITY_ID};
    use tui_dispatch::testing::*;

    fn actions_for(input: &str, state: &AppState, is_focused: bool) -> Vec<Action> {
        LookupScreen
            .handle_event(
                &EventKind::Key(key(input)),
                LookupScreenProps { state, is_focused },
            )
            .into_iter()
            .collect()
    }

    #[test]
    fn test_navigation_keys() {
        let state = AppState::default();
        actions_for("h", &state, true).assert_first(Action::Navigate(-1));
        actions_for("l", &state, true).assert_first(Action::Navigate(1));
        actions_for("/", &state, true).assert_first(Action::SearchStart);
        actions_for("f", &state, true).assert_first(Action::FavoriteToggle);
        actions_for("q", &state, true).assert_first(Action::Quit);
    }

    #[test]
    fn test_random_key_picks_in_range() {
        let state = AppState::default();
        let actions = actions_for("x", &state, true);
        actions.assert_count(1);
        match actions[0] {
            Action::RandomPick(id) => assert!((MIN_ENTITY_ID..=MAX_ENTITY_ID).contains(&id)),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let state = AppState::default();
        actions_for("h", &state, false).assert_empty();
    }

    #[test]
    fn test_layout_reserves_favorites_column() {
        let layout = screen_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.search.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.favorites.width, FAVORITES_WIDTH);
        assert_eq!(layout.body.width, 100 - FAVORITES_WIDTH);
    }

    #[test]
    fn test_render_idle_hint() {
        let mut render = RenderHarness::new(100, 30);
        let state = AppState::default();
        let output = render.render_to_string_plain(|frame| {
            LookupScreen.render(
                frame,
                frame.area(),
                LookupScreenProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains(view::IDLE_HINT));
    }
}
