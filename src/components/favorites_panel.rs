use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::{Component, Palette};
use crate::action::Action;
use crate::view::FavoriteView;

const EMPTY_HINT: &str = "No favorites yet. Press f on a Pokémon.";

/// Saved entries, newest last. Enter reopens one, `d` removes it.
pub struct FavoritesPanel {
    list: SelectList,
}

pub struct FavoritesPanelProps<'a> {
    pub favorites: &'a [FavoriteView],
    pub selected: usize,
    pub is_focused: bool,
    pub palette: Palette,
}

impl Default for FavoritesPanel {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl FavoritesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(favorites: &[FavoriteView]) -> Vec<Line<'static>> {
        favorites
            .iter()
            .map(|favorite| Line::from(Span::raw(favorite.label.clone())))
            .collect()
    }

    fn list_style(palette: Palette) -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(palette.panel),
                fg: Some(palette.text),
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }
}

const LIST_BEHAVIOR: SelectListBehavior = SelectListBehavior {
    show_scrollbar: true,
    wrap_navigation: true,
};

impl Component<Action> for FavoritesPanel {
    type Props<'a> = FavoritesPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Enter => return vec![Action::FavoriteOpen],
            KeyCode::Char('d') | KeyCode::Delete => return vec![Action::FavoriteRemove],
            KeyCode::Tab | KeyCode::Esc => return vec![Action::FocusNext],
            KeyCode::Char('q') => return vec![Action::Quit],
            _ => {}
        }

        let items = Self::items(props.favorites);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected,
            is_focused: true,
            style: Self::list_style(props.palette),
            behavior: LIST_BEHAVIOR,
            on_select: Action::FavoriteSelect,
            render_item: &|item| item.clone(),
        };
        self.list
            .handle_event(event, list_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let title = format!(" Favorites ({}) ", props.favorites.len());
        let block = props.palette.panel_block(&title, props.is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if props.favorites.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(EMPTY_HINT, props.palette.dim()))),
                inner,
            );
            return;
        }

        let items = Self::items(props.favorites);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected,
            is_focused: props.is_focused,
            style: Self::list_style(props.palette),
            behavior: LIST_BEHAVIOR,
            on_select: Action::FavoriteSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, inner, list_props);
    }
}
