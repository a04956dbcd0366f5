use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Table,
    TableState,
};

use crate::context::TreeRowContext;
use crate::glyphs::{TreeGlyphs, TreeLabelRenderer};
use crate::model::TreeModel;
use crate::state::{TreeViewState, VisibleNode};
use crate::style::TreeViewStyle;

/// File tree widget: one label column, rows produced from the visible-row cache.
pub struct FileTreeView<'a, T, L>
where
    T: TreeModel,
    L: TreeLabelRenderer<T>,
{
    model: &'a T,
    label: &'a L,
    style: TreeViewStyle<'a>,
    glyphs: TreeGlyphs<'a>,
}

impl<'a, T, L> FileTreeView<'a, T, L>
where
    T: TreeModel,
    L: TreeLabelRenderer<T>,
{
    pub const fn new(model: &'a T, label: &'a L, style: TreeViewStyle<'a>) -> Self {
        Self {
            model,
            label,
            style,
            glyphs: TreeGlyphs::unicode(),
        }
    }

    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[inline]
    fn build_rows(&self, nodes: &[VisibleNode<T::Id>], state: &TreeViewState<T::Id>) -> Vec<Row<'a>> {
        let mut rows = Vec::with_capacity(nodes.len());
        for node in nodes {
            let ctx = TreeRowContext {
                level: node.level,
                is_tail_stack: node.is_tail_stack.as_slice(),
                is_open: node.is_open,
                has_children: node.has_children,
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
                name_style: if node.has_children {
                    self.style.dir_style
                } else {
                    self.style.file_style
                },
            };
            let label_cell = self.label.cell(self.model, node.id, &ctx, &self.glyphs);
            rows.push(Row::new([label_cell]));
        }
        rows
    }

    #[inline]
    fn build_table(&self, rows: Vec<Row<'a>>, block: Block<'a>) -> Table<'a> {
        Table::new(rows, [Constraint::Percentage(100)])
            .style(self.style.block_style)
            .block(block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol)
    }

    #[inline]
    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        state: &TreeViewState<T::Id>,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = state
            .list_state()
            .offset()
            .min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl<T, L> StatefulWidget for FileTreeView<'_, T, L>
where
    T: TreeModel,
    L: TreeLabelRenderer<T>,
{
    type State = TreeViewState<T::Id>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.ensure_visible_nodes(self.model);

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height as usize;
        state.ensure_selection_visible_with_policy(inner_height, self.style.scroll_policy);

        let visible_nodes = state.visible_nodes();
        let total_rows = visible_nodes.len();
        let (range_start, range_end) = if self.style.virtualize_rows {
            let start = state.list_state().offset().min(total_rows);
            let end = (start + inner_height).min(total_rows);
            (start, end)
        } else {
            (0, total_rows)
        };

        let rows = self.build_rows(&visible_nodes[range_start..range_end], state);
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let mut local_state = if self.style.virtualize_rows {
            Some(*state.list_state())
        } else {
            None
        };
        let table_state: &mut TableState = local_state.as_mut().map_or_else(
            || state.list_state_mut(),
            |state_ref| {
                *state_ref.offset_mut() = 0;
                if let Some(selected) = state_ref.selected() {
                    if selected < range_start || selected >= range_end {
                        state_ref.select(None);
                    } else {
                        state_ref.select(Some(selected - range_start));
                    }
                }
                state_ref
            },
        );

        if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            let table = self.build_table(rows, block.borders(table_borders));
            table.render(table_area, buf, table_state);
            Self::render_scrollbar(scrollbar_area, buf, state, inner_height, scroll_rows);
        } else {
            let table = self.build_table(rows, block);
            table.render(area, buf, table_state);
        }
    }
}
