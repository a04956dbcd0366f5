use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use crate::context::TreeRowContext;
use crate::model::TreeModel;
use crate::tree::{NodeId, PathForest};

#[derive(Clone, Copy)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub file: &'a str,
    pub dir_open: &'a str,
    pub dir_closed: &'a str,
    pub commit: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "  ",
            file: "•",
            dir_open: "▼",
            dir_closed: "▶",
            commit: "─●─",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "  ",
            file: "*",
            dir_open: "v",
            dir_closed: ">",
            commit: "-o-",
        }
    }
}

pub trait TreeLabelProvider<T: TreeModel> {
    fn label<'a>(&'a self, model: &'a T, id: T::Id) -> &'a str;
}

pub trait TreeLabelRenderer<T: TreeModel> {
    fn cell<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a>;
}

impl<T, P> TreeLabelRenderer<T> for P
where
    T: TreeModel,
    P: TreeLabelProvider<T>,
{
    fn cell<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a> {
        Cell::from(tree_label_line(ctx, self.label(model, id), glyphs))
    }
}

/// Labels forest rows with the node name.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeName;

impl TreeLabelProvider<PathForest> for NodeName {
    fn label<'a>(&'a self, model: &'a PathForest, id: NodeId) -> &'a str {
        model.node(id).map_or("", |node| node.name.as_str())
    }
}

const fn expander<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> &'a str {
    if !ctx.has_children {
        glyphs.file
    } else if ctx.is_open {
        glyphs.dir_open
    } else {
        glyphs.dir_closed
    }
}

pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    name: &'a str,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let expander = expander(ctx, glyphs);

    if ctx.level == 0 || !ctx.draw_lines {
        let mut spans = Vec::with_capacity(ctx.level as usize + 3);
        for _ in 0..ctx.level {
            spans.push(Span::raw(glyphs.empty));
        }
        spans.push(Span::styled(expander, ctx.name_style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(name, ctx.name_style));
        return Line::from(spans);
    }

    let mut name_spans = Vec::with_capacity(ctx.is_tail_stack.len() + 3);

    for (l, is_last) in ctx.is_tail_stack.iter().enumerate() {
        let part = if l == (ctx.level as usize) - 1 {
            if *is_last {
                glyphs.branch_last
            } else {
                glyphs.branch
            }
        } else if *is_last {
            glyphs.indent
        } else {
            glyphs.vert
        };
        name_spans.push(Span::styled(part, ctx.line_style));
    }

    name_spans.push(Span::styled(expander, ctx.name_style));
    name_spans.push(Span::raw(" "));
    name_spans.push(Span::styled(name, ctx.name_style));
    Line::from(name_spans)
}

/// First line of a commit card footer: marker glyph plus the short id.
pub fn commit_marker<'a>(short_id: &'a str, glyphs: &TreeGlyphs<'a>) -> [Span<'a>; 3] {
    [Span::raw(glyphs.commit), Span::raw(" "), Span::raw(short_id)]
}
