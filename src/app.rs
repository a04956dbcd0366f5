//! Terminal application: a repository picker and the repository screen,
//! driven by crossterm events and fetch replies.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Margin, Position, Rect};
use ratatui::widgets::ListState;
use ratatui::{DefaultTerminal, Frame};

use crate::action::TreeEvent;
use crate::api::RepoApi;
use crate::config::Config;
use crate::controller::{RepoTreeController, SidebarMode, Status};
use crate::fetch::Fetch;
use crate::request::{Generations, Job, Payload, Reply, Request, Resource};
use crate::ui::{self, RepoLayout, UiOptions};
use crate::worker::Worker;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PAGE: u16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Picker,
    Repo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Default)]
struct Picker {
    repos: Vec<String>,
    status: Status,
    list: ListState,
    area: Rect,
    generations: Generations,
}

impl Picker {
    fn request(&mut self) -> Job {
        self.status = Status::Loading;
        Job {
            ticket: self.generations.issue(Resource::Repositories),
            request: Request::Repositories,
        }
    }

    fn apply(&mut self, repos: Fetch<Vec<String>>) {
        self.status = repos
            .failure()
            .map_or(Status::Loaded, |reason| Status::Failed(reason.to_string()));
        self.repos = repos.into_value();
        self.list.select((!self.repos.is_empty()).then_some(0));
    }

    fn selected(&self) -> Option<&str> {
        self.list
            .selected()
            .and_then(|idx| self.repos.get(idx))
            .map(String::as_str)
    }
}

pub struct App<A: RepoApi + ?Sized + 'static> {
    worker: Worker<A>,
    options: UiOptions,
    screen: Screen,
    picker: Picker,
    controller: RepoTreeController,
    layout: RepoLayout,
}

impl<A: RepoApi + ?Sized + 'static> App<A> {
    pub fn new(api: Arc<A>, config: &Config) -> Self {
        let mut controller = RepoTreeController::new(config.branch.clone());
        controller.tree_state_mut().set_draw_lines(config.draw_guides);
        controller.tree_state_mut().keymap_mut().set_profile(config.keymap);
        Self {
            worker: Worker::new(api),
            options: UiOptions::from_config(config),
            screen: Screen::Picker,
            picker: Picker::default(),
            controller,
            layout: RepoLayout {
                sidebar_visible: true,
                ..RepoLayout::default()
            },
        }
    }

    pub const fn screen(&self) -> Screen {
        self.screen
    }

    pub const fn controller(&self) -> &RepoTreeController {
        &self.controller
    }

    /// Shows the picker, fetching the repository list the first time.
    pub fn open_picker(&mut self) {
        self.screen = Screen::Picker;
        if matches!(self.picker.status, Status::Idle) {
            let job = self.picker.request();
            self.worker.spawn(job);
        }
    }

    pub fn open_repo(&mut self, repo: &str) {
        self.screen = Screen::Repo;
        self.layout.content_scroll = 0;
        self.layout.history_scroll = 0;
        let jobs = self.controller.activate(repo);
        self.worker.spawn_all(jobs);
    }

    pub fn on_reply(&mut self, reply: Reply) {
        match reply.payload {
            Payload::Repositories(repos) => {
                if self.picker.generations.is_current(reply.ticket) {
                    self.picker.apply(repos);
                } else {
                    tracing::debug!(ticket = ?reply.ticket, "discarding stale repository list");
                }
            }
            payload => {
                let is_content = matches!(payload, Payload::Content { .. });
                let applied = self.controller.apply(Reply {
                    ticket: reply.ticket,
                    payload,
                });
                if applied && is_content {
                    self.layout.content_scroll = 0;
                }
            }
        }
    }

    /// Applies every reply that has arrived so far.
    pub fn pump(&mut self) {
        for reply in self.worker.drain() {
            self.on_reply(reply);
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Picker => {
                self.picker.area = area;
                ui::render_picker(
                    frame,
                    area,
                    &self.picker.repos,
                    &self.picker.status,
                    &mut self.picker.list,
                    &self.options,
                );
            }
            Screen::Repo => {
                ui::render_repo(frame, area, &mut self.controller, &mut self.layout, &self.options);
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => {
                self.handle_mouse(*mouse);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return Flow::Quit;
        }
        match self.screen {
            Screen::Picker => self.handle_picker_key(key),
            Screen::Repo => self.handle_repo_key(key),
        }
        Flow::Continue
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.picker.list.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self.picker.list.selected().map_or(0, |idx| idx + 1);
                if next < self.picker.repos.len() {
                    self.picker.list.select(Some(next));
                }
            }
            KeyCode::Enter => {
                if let Some(repo) = self.picker.selected().map(str::to_string) {
                    self.open_repo(&repo);
                }
            }
            KeyCode::Char('r') => {
                let job = self.picker.request();
                self.worker.spawn(job);
            }
            _ => {}
        }
    }

    fn handle_repo_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Char('c') => self.controller.toggle_view(),
            KeyCode::Char('s') => self.layout.sidebar_visible = !self.layout.sidebar_visible,
            KeyCode::Char('r') => {
                if let Some(jobs) = self.controller.reload() {
                    self.worker.spawn_all(jobs);
                }
            }
            KeyCode::Backspace | KeyCode::Char('b') => self.open_picker(),
            KeyCode::PageDown => self.scroll_content(i32::from(PAGE)),
            KeyCode::PageUp => self.scroll_content(-i32::from(PAGE)),
            KeyCode::Char('J') => self.scroll_content(1),
            KeyCode::Char('K') => self.scroll_content(-1),
            KeyCode::Char(']') => {
                self.layout.history_scroll = self
                    .layout
                    .history_scroll
                    .saturating_add(1)
                    .min(self.layout.history_max_scroll);
            }
            KeyCode::Char('[') => {
                self.layout.history_scroll = self.layout.history_scroll.saturating_sub(1);
            }
            _ => self.handle_tree_key(key),
        }
    }

    /// Scrolls the content pane, stopping once its last wrapped row is on screen.
    fn scroll_content(&mut self, delta: i32) {
        let next = i32::from(self.layout.content_scroll).saturating_add(delta);
        self.layout.content_scroll = u16::try_from(next.max(0))
            .unwrap_or(u16::MAX)
            .min(self.layout.content_max_scroll);
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        if !self.layout.sidebar_visible || self.controller.mode() != SidebarMode::Tree {
            return;
        }
        let (forest, state) = self.controller.tree_parts();
        if let TreeEvent::Activated(id) = state.handle_key(forest, key)
            && let Some(job) = self.controller.activate_node(id)
        {
            self.worker.spawn(job);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        match self.screen {
            Screen::Picker => {
                let inner = self.picker.area.inner(Margin::new(1, 1));
                if !inner.contains(position) {
                    return;
                }
                let row = self.picker.list.offset() + usize::from(position.y - inner.y);
                if let Some(repo) = self.picker.repos.get(row).cloned() {
                    self.picker.list.select(Some(row));
                    self.open_repo(&repo);
                }
            }
            Screen::Repo => {
                let rows = self.layout.tree_rows;
                if !rows.contains(position) {
                    return;
                }
                let row = self
                    .controller
                    .tree_state()
                    .row_in_viewport(usize::from(position.y - rows.y));
                if let Some(job) = self.controller.activate_row(row) {
                    self.worker.spawn(job);
                }
            }
        }
    }

    /// Event loop: apply replies, draw, then wait briefly for input.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        loop {
            self.pump();
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(POLL_INTERVAL)? && self.handle_event(&event::read()?) == Flow::Quit {
                return Ok(());
            }
        }
    }
}
