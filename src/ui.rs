//! Screen layout. Every function here only reads application state, apart
//! from the selection/scroll bookkeeping ratatui keeps in widget state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::config::Config;
use crate::controller::{RepoTreeController, SidebarMode, Status};
use crate::glyphs::{NodeName, TreeGlyphs};
use crate::history::CommitHistoryView;
use crate::style::TreeViewStyle;
use crate::widget::FileTreeView;

pub const LOADING: &str = "Loading…";
pub const NO_REPOSITORIES: &str = "No repositories";
pub const NO_COMMITS: &str = "No commits";

const TEXT: Color = Color::Rgb(82, 82, 91);
const MUTED: Color = Color::Rgb(113, 113, 122);
const BORDER: Color = Color::Rgb(161, 161, 170);
const ERROR: Color = Color::Rgb(220, 38, 38);

/// Rendering switches taken from the config.
#[derive(Clone, Copy)]
pub struct UiOptions {
    pub glyphs: TreeGlyphs<'static>,
    pub sidebar_percent: u16,
    pub show_fetch_errors: bool,
}

impl UiOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            glyphs: if config.ascii_glyphs {
                TreeGlyphs::ascii()
            } else {
                TreeGlyphs::unicode()
            },
            sidebar_percent: config.sidebar_percent(),
            show_fetch_errors: config.show_fetch_errors,
        }
    }
}

impl Default for UiOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Scroll positions and hit-test areas of the repository screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct RepoLayout {
    pub sidebar_visible: bool,
    pub content_scroll: u16,
    pub history_scroll: u16,
    /// Largest useful `content_scroll` for the wrapped text as last drawn.
    pub content_max_scroll: u16,
    /// Largest useful `history_scroll` for the cards as last drawn.
    pub history_max_scroll: u16,
    /// Rows of the file tree as last drawn; empty when the tree is hidden.
    pub tree_rows: Rect,
}

/// Offset that puts the last of `rows` wrapped rows on the bottom line of `view`.
fn max_scroll(rows: usize, view: Rect) -> u16 {
    u16::try_from(rows.saturating_sub(usize::from(view.height))).unwrap_or(u16::MAX)
}

fn pane(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(title)
}

/// Message shown instead of a pane body, if any.
fn placeholder(status: &Status, show_errors: bool) -> Option<Line<'static>> {
    match status {
        Status::Loading => Some(Line::styled(LOADING, Style::default().fg(MUTED))),
        Status::Failed(reason) if show_errors => Some(Line::styled(
            reason.clone(),
            Style::default().fg(ERROR),
        )),
        _ => None,
    }
}

pub fn render_picker(
    frame: &mut Frame,
    area: Rect,
    repos: &[String],
    status: &Status,
    list: &mut ListState,
    options: &UiOptions,
) {
    let block = pane(" Repositories ");
    let message = placeholder(status, options.show_fetch_errors).or_else(|| {
        repos
            .is_empty()
            .then(|| Line::styled(NO_REPOSITORIES, Style::default().fg(MUTED)))
    });
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let items: Vec<ListItem> = repos.iter().map(|repo| ListItem::new(repo.as_str())).collect();
    let list_widget = List::new(items)
        .block(block)
        .style(Style::default().fg(TEXT))
        .highlight_style(TreeViewStyle::zinc().highlight_style);
    frame.render_stateful_widget(list_widget, area, list);
}

/// Draws the repository screen and records where the tree rows landed.
pub fn render_repo(
    frame: &mut Frame,
    area: Rect,
    controller: &mut RepoTreeController,
    layout: &mut RepoLayout,
    options: &UiOptions,
) {
    layout.tree_rows = Rect::default();
    if !layout.sidebar_visible {
        render_content(frame, area, controller, layout, options);
        return;
    }

    let [sidebar, content] = Layout::horizontal([
        Constraint::Percentage(options.sidebar_percent),
        Constraint::Min(0),
    ])
    .areas(area);
    render_sidebar(frame, sidebar, controller, layout, options);
    render_content(frame, content, controller, layout, options);
}

fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    controller: &mut RepoTreeController,
    layout: &mut RepoLayout,
    options: &UiOptions,
) {
    let [header, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let switch = match controller.mode() {
        SidebarMode::Tree => "[ ] Show Commit History",
        SidebarMode::History => "[x] Show Commit History",
    };
    let title = controller.repo().unwrap_or_default().to_string();
    let header_text = vec![
        Line::styled(title, Style::default().fg(TEXT).add_modifier(Modifier::BOLD)),
        Line::from(vec![
            Span::styled(switch, Style::default().fg(MUTED).add_modifier(Modifier::BOLD)),
            Span::styled("  (tab)", Style::default().fg(BORDER)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(header_text).block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(BORDER))),
        header,
    );

    match controller.mode() {
        SidebarMode::Tree => {
            if let Some(message) = placeholder(controller.tree_status(), options.show_fetch_errors) {
                frame.render_widget(Paragraph::new(message).block(pane(" Files ")), body);
                return;
            }
            let mut style = TreeViewStyle::zinc();
            style.title = Some(Line::from(" Files "));
            layout.tree_rows = Block::default().borders(style.borders).inner(body);
            let label = NodeName;
            let (forest, state) = controller.tree_parts();
            let widget = FileTreeView::new(forest, &label, style).glyphs(options.glyphs);
            frame.render_stateful_widget(widget, body, state);
        }
        SidebarMode::History => {
            layout.history_max_scroll = 0;
            let block = pane(" History ");
            let message = placeholder(controller.history_status(), options.show_fetch_errors)
                .or_else(|| {
                    controller
                        .commits()
                        .is_empty()
                        .then(|| Line::styled(NO_COMMITS, Style::default().fg(MUTED)))
                });
            if let Some(message) = message {
                frame.render_widget(Paragraph::new(message).block(block), body);
                return;
            }
            let inner = block.inner(body);
            let view = CommitHistoryView::new(controller.commits())
                .glyphs(options.glyphs)
                .styles(
                    Style::default().fg(MUTED),
                    Style::default().fg(TEXT),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                );
            layout.history_max_scroll = max_scroll(view.line_count(inner.width), inner);
            layout.history_scroll = layout.history_scroll.min(layout.history_max_scroll);
            frame.render_widget(view.block(block).scroll(layout.history_scroll), body);
        }
    }
}

fn render_content(
    frame: &mut Frame,
    area: Rect,
    controller: &RepoTreeController,
    layout: &mut RepoLayout,
    options: &UiOptions,
) {
    layout.content_max_scroll = 0;
    let file = controller.file();
    let title = Line::styled(
        format!(" {} ", file.name),
        Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
    );
    let block = pane(title);
    if let Some(message) = placeholder(&file.status, options.show_fetch_errors) {
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }
    let inner = block.inner(area);
    let body = Paragraph::new(file.content.as_str())
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: false });
    layout.content_max_scroll = max_scroll(body.line_count(inner.width), inner);
    layout.content_scroll = layout.content_scroll.min(layout.content_max_scroll);
    frame.render_widget(body.block(block).scroll((layout.content_scroll, 0)), area);
}
