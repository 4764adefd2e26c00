use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::evolution_strip::render_pending;
use super::theme::BRAND_BLUE;
use super::{Component, Palette};
use crate::action::Action;
use crate::view::{CardsView, SectionView};

/// Trading-card matches for the displayed entity, one at a time.
pub struct CardCarousel;

pub struct CardCarouselProps<'a> {
    pub section: &'a SectionView<CardsView>,
    pub palette: Palette,
}

impl Component<Action> for CardCarousel {
    type Props<'a> = CardCarouselProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = props.palette.panel_block(" TCG Cards ", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if render_pending(frame, inner, props.section, props.palette) {
            return;
        }
        let SectionView::Ready(view) = props.section else {
            return;
        };
        let Some(card) = view.current() else {
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                card.name.clone(),
                Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.set_name.clone(), props.palette.dim())),
            Line::from(Span::styled(card.image_url.clone(), props.palette.dim())),
            Line::from(Span::styled(
                format!("‹ {}/{} ›", view.index + 1, view.cards.len()),
                props.palette.accent(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CardSummary, Theme};
    use crate::view::{NO_CARDS, cards_view};
    use tui_dispatch::testing::*;

    fn render_section(section: &SectionView<CardsView>) -> String {
        let mut render = RenderHarness::new(60, 7);
        render.render_to_string_plain(|frame| {
            CardCarousel.render(
                frame,
                frame.area(),
                CardCarouselProps {
                    section,
                    palette: Palette::for_theme(Theme::Dark),
                },
            );
        })
    }

    #[test]
    fn test_renders_current_card_position() {
        let cards = vec![
            CardSummary {
                name: "Pikachu".into(),
                image_url: "https://images/base1-58_hires.png".into(),
                set_name: "Base".into(),
            },
            CardSummary {
                name: "Pikachu V".into(),
                image_url: "https://images/swsh4-43_hires.png".into(),
                set_name: "Vivid Voltage".into(),
            },
        ];
        let output = render_section(&cards_view(&cards, 1));
        assert!(output.contains("Pikachu V"));
        assert!(output.contains("Vivid Voltage"));
        assert!(output.contains("2/2"));
    }

    #[test]
    fn test_renders_no_cards_message() {
        let output = render_section(&cards_view(&[], 0));
        assert!(output.contains(NO_CARDS));
    }
}
