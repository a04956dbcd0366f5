use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Scroll behavior when the selected row changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Visual settings of the file tree widget.
#[derive(Clone)]
pub struct TreeViewStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    pub line_style: Style,
    pub dir_style: Style,
    pub file_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub virtualize_rows: bool,
    pub scroll_policy: TreeScrollPolicy,
}

impl Default for TreeViewStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default(),
            line_style: Style::default(),
            dir_style: Style::default(),
            file_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            virtualize_rows: false,
            scroll_policy: TreeScrollPolicy::KeepInView,
        }
    }
}

impl TreeViewStyle<'_> {
    /// Muted zinc-like palette used by the application.
    pub fn zinc() -> Self {
        Self {
            border_style: Style::default().fg(Color::Rgb(161, 161, 170)),
            highlight_style: Style::default()
                .fg(Color::Rgb(244, 244, 245))
                .bg(Color::Rgb(63, 63, 70))
                .add_modifier(Modifier::BOLD),
            line_style: Style::default().fg(Color::Rgb(113, 113, 122)),
            dir_style: Style::default().fg(Color::Rgb(212, 212, 216)),
            file_style: Style::default().fg(Color::Rgb(161, 161, 170)),
            highlight_symbol: "",
            virtualize_rows: true,
            ..Self::default()
        }
    }
}
