use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders},
};

use crate::state::Theme;
use crate::view::Rgb;

pub const BRAND_RED: Color = Color::Rgb(0xE3, 0x35, 0x0D);
pub const BRAND_YELLOW: Color = Color::Rgb(0xFF, 0xD6, 0x00);
pub const BRAND_BLUE: Color = Color::Rgb(0x3B, 0x4C, 0xCA);

/// Colours for the light and dark themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::Rgb(250, 250, 250),
                panel: Color::Rgb(255, 251, 231),
                text: Color::Rgb(33, 37, 41),
                dim: Color::Rgb(108, 117, 125),
                border: BRAND_YELLOW,
                accent: BRAND_BLUE,
            },
            Theme::Dark => Self {
                bg: Color::Rgb(24, 26, 32),
                panel: Color::Rgb(34, 38, 48),
                text: Color::Rgb(228, 232, 240),
                dim: Color::Rgb(150, 156, 170),
                border: Color::Rgb(74, 82, 104),
                accent: BRAND_YELLOW,
            },
        }
    }

    pub fn panel_block<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        let border = if focused { BRAND_RED } else { self.border };
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .style(Style::default().bg(self.panel).fg(self.text))
            .border_style(Style::default().fg(border))
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Dark text on light type colours, light text otherwise.
pub fn contrast_text(rgb: Rgb) -> Color {
    let luma = 299 * rgb.0 as u32 + 587 * rgb.1 as u32 + 114 * rgb.2 as u32;
    if luma / 1000 > 140 {
        Color::Rgb(20, 20, 20)
    } else {
        Color::Rgb(245, 245, 245)
    }
}
