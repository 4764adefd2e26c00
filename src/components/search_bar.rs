use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;

use super::theme::BRAND_RED;
use super::{Component, Palette};
use crate::action::Action;

const PLACEHOLDER: &str = "Name or number, e.g. pikachu or 25";

pub struct SearchBar;

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub active: bool,
    pub is_focused: bool,
    pub palette: Palette,
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.active {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SearchInput(ch))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = props.palette.panel_block(" Search ", props.active);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = if props.active {
            let mut spans = vec![Span::styled("› ", props.palette.accent())];
            if props.query.is_empty() {
                spans.push(Span::styled(PLACEHOLDER, props.palette.dim()));
            } else {
                spans.push(Span::raw(props.query));
            }
            spans.push(Span::styled(
                "▏",
                Style::default().fg(BRAND_RED).add_modifier(Modifier::SLOW_BLINK),
            ));
            Line::from(spans)
        } else if props.query.is_empty() {
            Line::from(Span::styled("/ to search", props.palette.dim()))
        } else {
            Line::from(vec![
                Span::styled("last: ", props.palette.dim()),
                Span::raw(props.query),
            ])
        };
        frame.render_widget(Paragraph::new(line), inner);
    }
}
