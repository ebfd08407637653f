//! Flex layout primitive: rows or columns of child components.

use std::ops::Range;

use crate::core::component::Component;
use crate::core::text::{pad_to_width, truncate_to_width, visible_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Row,
    Column,
}

/// Cross-axis alignment: horizontal for columns, vertical for rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Lines produced by a layout pass plus the rows each child landed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexLayout {
    pub lines: Vec<String>,
    /// One range per child, in child order. Children that rendered nothing get an
    /// empty range positioned where they would have started.
    pub child_rows: Vec<Range<usize>>,
}

pub struct Flex {
    direction: Direction,
    gap: usize,
    align: Align,
    padding_x: usize,
    padding_y: usize,
    children: Vec<Box<dyn Component>>,
}

impl Flex {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            gap: 0,
            align: Align::Start,
            padding_x: 0,
            padding_y: 0,
            children: Vec::new(),
        }
    }

    pub fn column() -> Self {
        Self::new(Direction::Column)
    }

    pub fn row() -> Self {
        Self::new(Direction::Row)
    }

    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn padding(mut self, padding_x: usize, padding_y: usize) -> Self {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
        self
    }

    pub fn add_child(&mut self, component: Box<dyn Component>) {
        self.children.push(component);
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Component>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Lays out borrowed children, for owners that keep their parts as fields.
    pub fn layout(&self, width: usize, children: &mut [&mut dyn Component]) -> FlexLayout {
        if width == 0 {
            return FlexLayout {
                lines: Vec::new(),
                child_rows: vec![0..0; children.len()],
            };
        }

        let content_width = width.saturating_sub(self.padding_x * 2).max(1);
        let mut layout = match self.direction {
            Direction::Column => self.layout_column(content_width, children),
            Direction::Row => self.layout_row(content_width, children),
        };

        let left = " ".repeat(self.padding_x);
        let blank = " ".repeat(width);
        let mut lines = Vec::with_capacity(layout.lines.len() + self.padding_y * 2);
        lines.extend(std::iter::repeat(blank.clone()).take(self.padding_y));
        for line in layout.lines.drain(..) {
            lines.push(pad_to_width(&format!("{left}{line}"), width));
        }
        lines.extend(std::iter::repeat(blank).take(self.padding_y));

        for range in layout.child_rows.iter_mut() {
            *range = range.start + self.padding_y..range.end + self.padding_y;
        }
        layout.lines = lines;
        layout
    }

    fn layout_column(&self, width: usize, children: &mut [&mut dyn Component]) -> FlexLayout {
        let mut lines = Vec::new();
        let mut child_rows = Vec::with_capacity(children.len());

        for child in children.iter_mut() {
            let rendered = child.render(width);
            if rendered.is_empty() {
                child_rows.push(lines.len()..lines.len());
                continue;
            }
            if !lines.is_empty() {
                lines.extend(std::iter::repeat(" ".repeat(width)).take(self.gap));
            }
            let start = lines.len();
            for line in rendered {
                lines.push(self.align_horizontally(&line, width));
            }
            child_rows.push(start..lines.len());
        }

        FlexLayout { lines, child_rows }
    }

    fn layout_row(&self, width: usize, children: &mut [&mut dyn Component]) -> FlexLayout {
        let count = children.len();
        if count == 0 {
            return FlexLayout::default();
        }

        let gaps = self.gap * (count - 1);
        let available = width.saturating_sub(gaps);
        let share = available / count;
        let remainder = available % count;
        let widths: Vec<usize> = (0..count)
            .map(|index| (share + usize::from(index < remainder)).max(1))
            .collect();

        let cells: Vec<Vec<String>> = children
            .iter_mut()
            .zip(widths.iter())
            .map(|(child, width)| child.render(*width))
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0);

        let gap = " ".repeat(self.gap);
        let mut lines = Vec::with_capacity(height);
        for row in 0..height {
            let mut line = String::new();
            for (index, (cell, cell_width)) in cells.iter().zip(widths.iter()).enumerate() {
                if index > 0 {
                    line.push_str(&gap);
                }
                let offset = match self.align {
                    Align::Start => 0,
                    Align::Center => (height - cell.len()) / 2,
                    Align::End => height - cell.len(),
                };
                let text = row
                    .checked_sub(offset)
                    .and_then(|inner| cell.get(inner))
                    .map(String::as_str)
                    .unwrap_or("");
                line.push_str(&truncate_to_width(text, *cell_width, "", true));
            }
            lines.push(line);
        }

        FlexLayout {
            lines,
            child_rows: vec![0..height; count],
        }
    }

    fn align_horizontally(&self, line: &str, width: usize) -> String {
        let line = truncate_to_width(line, width, "", false);
        let free = width.saturating_sub(visible_width(&line));
        let lead = match self.align {
            Align::Start => 0,
            Align::Center => free / 2,
            Align::End => free,
        };
        pad_to_width(&format!("{}{line}", " ".repeat(lead)), width)
    }
}

impl Default for Flex {
    fn default() -> Self {
        Self::column()
    }
}

impl Component for Flex {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut children = std::mem::take(&mut self.children);
        let layout = {
            let mut borrowed: Vec<&mut dyn Component> = children
                .iter_mut()
                .map(|child| &mut **child as &mut dyn Component)
                .collect();
            self.layout(width, &mut borrowed).lines
        };
        self.children = children;
        layout
    }

    fn invalidate(&mut self) {
        for child in self.children.iter_mut() {
            child.invalidate();
        }
    }
}
