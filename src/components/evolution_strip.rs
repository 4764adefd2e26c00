use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::theme::BRAND_BLUE;
use super::{Component, Palette};
use crate::action::Action;
use crate::view::{EVOLUTION_SEPARATOR, EvolutionStep, SectionView};

/// Draws a section body that is still loading or only a placeholder.
/// Returns `false` when the caller should draw the ready content.
pub(crate) fn render_pending<T>(
    frame: &mut Frame,
    area: Rect,
    section: &SectionView<T>,
    palette: Palette,
) -> bool {
    let text = match section {
        SectionView::Hidden => return true,
        SectionView::Ready(_) => return false,
        SectionView::Loading => "Loading...",
        SectionView::Placeholder(text) => *text,
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, palette.dim()))),
        area,
    );
    true
}

pub struct EvolutionStrip;

pub struct EvolutionStripProps<'a> {
    pub section: &'a SectionView<Vec<EvolutionStep>>,
    pub palette: Palette,
}

impl Component<Action> for EvolutionStrip {
    type Props<'a> = EvolutionStripProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = props.palette.panel_block(" Evolutions ", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if render_pending(frame, inner, props.section, props.palette) {
            return;
        }
        let SectionView::Ready(steps) = props.section else {
            return;
        };

        let spans: Vec<Span> = steps
            .iter()
            .map(|step| match step {
                EvolutionStep::Stage { name, id } => Span::styled(
                    match id {
                        Some(id) => format!("{name} #{id}"),
                        None => name.clone(),
                    },
                    Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
                ),
                EvolutionStep::Separator => Span::styled(
                    format!(" {EVOLUTION_SEPARATOR} "),
                    props.palette.accent(),
                ),
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

pub struct BadgeList;

pub struct BadgeListProps<'a> {
    pub title: &'a str,
    pub section: &'a SectionView<Vec<String>>,
    pub badge: Color,
    pub palette: Palette,
}

impl Component<Action> for BadgeList {
    type Props<'a> = BadgeListProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = props.palette.panel_block(props.title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if render_pending(frame, inner, props.section, props.palette) {
            return;
        }
        let SectionView::Ready(badges) = props.section else {
            return;
        };

        let style = Style::default().bg(props.badge).fg(Color::Black);
        let mut spans = Vec::with_capacity(badges.len() * 2);
        for badge in badges {
            spans.push(Span::styled(format!(" {badge} "), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false }),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Theme;
    use crate::view::{NO_ENCOUNTERS, UNAVAILABLE};
    use tui_dispatch::testing::*;

    fn palette() -> Palette {
        Palette::for_theme(Theme::Light)
    }

    #[test]
    fn test_strip_renders_stages_and_omits_unknown_ids() {
        let mut render = RenderHarness::new(70, 3);
        let section = SectionView::Ready(vec![
            EvolutionStep::Stage {
                name: "Charmander".into(),
                id: Some(4),
            },
            EvolutionStep::Separator,
            EvolutionStep::Stage {
                name: "Charmeleon".into(),
                id: None,
            },
        ]);

        let output = render.render_to_string_plain(|frame| {
            EvolutionStrip.render(
                frame,
                frame.area(),
                EvolutionStripProps {
                    section: &section,
                    palette: palette(),
                },
            );
        });

        assert!(output.contains("Charmander #4 → Charmeleon"));
        assert!(!output.contains("#0"));
    }

    #[test]
    fn test_strip_unavailable_placeholder() {
        let mut render = RenderHarness::new(40, 3);
        let section: SectionView<Vec<EvolutionStep>> = SectionView::Placeholder(UNAVAILABLE);

        let output = render.render_to_string_plain(|frame| {
            EvolutionStrip.render(
                frame,
                frame.area(),
                EvolutionStripProps {
                    section: &section,
                    palette: palette(),
                },
            );
        });

        assert!(output.contains(UNAVAILABLE));
    }

    #[test]
    fn test_badges_and_empty_placeholder() {
        let mut render = RenderHarness::new(50, 4);
        let section = SectionView::Ready(vec!["razor wind".to_string(), "cut".to_string()]);
        let output = render.render_to_string_plain(|frame| {
            BadgeList.render(
                frame,
                frame.area(),
                BadgeListProps {
                    title: " Moves ",
                    section: &section,
                    badge: Color::Green,
                    palette: palette(),
                },
            );
        });
        assert!(output.contains("razor wind"));
        assert!(output.contains("cut"));

        let empty: SectionView<Vec<String>> = SectionView::Placeholder(NO_ENCOUNTERS);
        let output = render.render_to_string_plain(|frame| {
            BadgeList.render(
                frame,
                frame.area(),
                BadgeListProps {
                    title: " Encounters ",
                    section: &empty,
                    badge: Color::Cyan,
                    palette: palette(),
                },
            );
        });
        assert!(output.contains(NO_ENCOUNTERS));
    }
}
