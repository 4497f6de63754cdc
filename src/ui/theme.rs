use ratatui::style::Color;

use crate::prefs::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub bar_bg: Color,
    pub key_bg: Color,
    pub highlight_bg: Color,
    pub selected: Color,
    pub answered: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub open: Color,
    pub warning: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::Rgb(250, 250, 247),
            fg: Color::Rgb(30, 30, 30),
            muted: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(25, 95, 170),
            bar_bg: Color::Rgb(222, 226, 232),
            key_bg: Color::Rgb(235, 237, 240),
            highlight_bg: Color::Rgb(205, 222, 245),
            selected: Color::Rgb(20, 120, 60),
            answered: Color::Rgb(20, 120, 60),
            correct: Color::Rgb(20, 120, 60),
            incorrect: Color::Rgb(185, 30, 30),
            open: Color::Rgb(150, 95, 0),
            warning: Color::Rgb(170, 100, 0),
        },
        Theme::Dark => Palette {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            bar_bg: Color::DarkGray,
            key_bg: Color::Rgb(20, 20, 20),
            highlight_bg: Color::Rgb(60, 60, 60),
            selected: Color::Green,
            answered: Color::LightBlue,
            correct: Color::Green,
            incorrect: Color::Red,
            open: Color::Yellow,
            warning: Color::Yellow,
        },
    }
}
