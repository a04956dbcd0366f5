//! Commit history: newest-first presentation of the commit list as cards.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use serde::{Deserialize, Serialize};

use crate::glyphs::{TreeGlyphs, commit_marker};

/// Number of leading identifier characters shown on a card.
pub const SHORT_ID_LEN: usize = 5;

/// One historical change record as delivered by the history endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub author: String,
    pub commit: String,
    pub message: String,
}

impl Commit {
    /// First [`SHORT_ID_LEN`] characters of the identifier (whole id if shorter).
    pub fn short_id(&self) -> &str {
        self.commit
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.commit.as_str(), |(end, _)| &self.commit[..end])
    }
}

/// Returns the commits in reverse of received order; the input is untouched.
pub fn present(commits: &[Commit]) -> Vec<Commit> {
    commits.iter().rev().cloned().collect()
}

/// Renders already-presented commits as stacked cards: author, message, marker + short id.
pub struct CommitHistoryView<'a> {
    commits: &'a [Commit],
    glyphs: TreeGlyphs<'a>,
    block: Option<Block<'a>>,
    author_style: Style,
    message_style: Style,
    id_style: Style,
    scroll: u16,
}

impl<'a> CommitHistoryView<'a> {
    pub const fn new(commits: &'a [Commit]) -> Self {
        Self {
            commits,
            glyphs: TreeGlyphs::unicode(),
            block: None,
            author_style: Style::new(),
            message_style: Style::new(),
            id_style: Style::new().add_modifier(Modifier::BOLD),
            scroll: 0,
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub const fn styles(mut self, author: Style, message: Style, id: Style) -> Self {
        self.author_style = author;
        self.message_style = message;
        self.id_style = id;
        self
    }

    #[must_use]
    pub const fn scroll(mut self, lines: u16) -> Self {
        self.scroll = lines;
        self
    }

    /// Rows the cards occupy once wrapped to `width`, excluding the block.
    pub fn line_count(&self, width: u16) -> usize {
        Paragraph::new(self.text())
            .wrap(Wrap { trim: false })
            .line_count(width)
    }

    fn text(&self) -> Text<'a> {
        let mut lines = Vec::with_capacity(self.commits.len() * 4);
        for (idx, commit) in self.commits.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::styled(commit.author.as_str(), self.author_style));
            for message_line in commit.message.lines() {
                lines.push(Line::styled(message_line, self.message_style));
            }
            let [marker, gap, id] = commit_marker(commit.short_id(), &self.glyphs);
            lines.push(Line::from(vec![
                marker.style(self.message_style),
                gap,
                Span::styled(id.content, self.id_style),
            ]));
        }
        Text::from(lines)
    }
}

impl Widget for CommitHistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self
            .block
            .clone()
            .unwrap_or_else(|| Block::default().borders(Borders::NONE));
        Paragraph::new(self.text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}
