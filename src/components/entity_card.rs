use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::Component;
use super::theme::{self, BRAND_RED, BRAND_YELLOW};
use crate::action::Action;
use crate::view::EntityView;

pub struct EntityCard;

pub struct EntityCardProps<'a> {
    pub view: &'a EntityView,
}

const BAR_WIDTH: usize = 20;

fn stat_line(label: &str, value: u16, percent: f64, fg: ratatui::style::Color) -> Line<'static> {
    let filled = ((percent / 100.0 * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(fg)),
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(BRAND_RED).add_modifier(Modifier::BOLD),
        ),
        Span::styled("░".repeat(empty), Style::default().fg(fg)),
        Span::styled(format!(" {value:>3}"), Style::default().fg(fg)),
    ])
}

impl Component<Action> for EntityCard {
    type Props<'a> = EntityCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let view = props.view;
        let bg = theme::color(view.background);
        let fg = theme::contrast_text(view.background);

        let heart = if view.is_favorite { "♥" } else { "♡" };
        let mut title = vec![
            Span::styled(
                format!(" #{} {} ", view.id, view.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{heart} "), Style::default().fg(BRAND_RED)),
        ];
        if view.legendary {
            title.push(Span::styled(
                "♛ legendary ",
                Style::default().fg(BRAND_YELLOW).add_modifier(Modifier::BOLD),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(title))
            .style(Style::default().bg(bg).fg(fg))
            .border_style(Style::default().fg(BRAND_YELLOW));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(5), // Profile
            Constraint::Min(0),    // Stats
        ])
        .split(inner);

        let profile = vec![
            Line::from(vec![Span::raw("Type:   "), Span::raw(view.types.clone())]),
            Line::from(format!("Height: {} m", view.height_m)),
            Line::from(format!("Weight: {} kg", view.weight_kg)),
            Line::from(Span::styled(
                view.sprite_url.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(Span::styled(
                view.cry_url.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(profile), chunks[0]);

        let stats: Vec<Line> = view
            .stats
            .iter()
            .map(|stat| stat_line(&stat.label, stat.value, stat.percent, fg))
            .collect();
        frame.render_widget(Paragraph::new(stats), chunks[1]);
    }
}
