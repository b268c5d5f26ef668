//! Text-field editor for creating and editing categories.

use crate::category::{Category, Segment};
use crate::error::Result;
use crate::time_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum FormColumn {
    #[default]
    Description,
    #[strum(to_string = "Split time")]
    Split,
    #[strum(to_string = "Segment time")]
    Segment,
    #[strum(to_string = "Best time")]
    Best,
}

impl FormColumn {
    const ALL: [FormColumn; 4] = [
        FormColumn::Description,
        FormColumn::Split,
        FormColumn::Segment,
        FormColumn::Best,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentRow {
    pub description: String,
    pub split: String,
    pub segment: String,
    pub best: String,
}

impl SegmentRow {
    fn from_segment(segment: &Segment) -> Self {
        let text = |ms: Option<u64>| ms.map(time_format::format).unwrap_or_default();
        Self {
            description: segment.description.clone(),
            split: text(segment.split_time),
            segment: text(segment.segment_time),
            best: text(segment.best_time),
        }
    }

    pub fn field(&self, column: FormColumn) -> &str {
        match column {
            FormColumn::Description => &self.description,
            FormColumn::Split => &self.split,
            FormColumn::Segment => &self.segment,
            FormColumn::Best => &self.best,
        }
    }

    fn field_mut(&mut self, column: FormColumn) -> &mut String {
        match column {
            FormColumn::Description => &mut self.description,
            FormColumn::Split => &mut self.split,
            FormColumn::Segment => &mut self.segment,
            FormColumn::Best => &mut self.best,
        }
    }

    fn to_segment(&self) -> Result<Segment> {
        Ok(Segment {
            description: self.description.trim().to_string(),
            split_time: time_format::parse_opt(&self.split)?,
            segment_time: time_format::parse_opt(&self.segment)?,
            best_time: time_format::parse_opt(&self.best)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    /// Index of the category being edited, `None` when creating.
    pub editing: Option<usize>,
    pub title: String,
    pub rows: Vec<SegmentRow>,
    /// 0 is the title line, `n` is `rows[n - 1]`.
    pub line: usize,
    pub column: FormColumn,
    pub error: Option<String>,
}

impl CategoryForm {
    pub fn create() -> Self {
        Self {
            rows: vec![SegmentRow::default()],
            ..Self::default()
        }
    }

    pub fn edit(index: usize, category: &Category) -> Self {
        Self {
            editing: Some(index),
            title: category.title.clone(),
            rows: category.segments.iter().map(SegmentRow::from_segment).collect(),
            ..Self::default()
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Category"
        } else {
            "Create Category"
        }
    }

    pub fn on_title(&self) -> bool {
        self.line == 0
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.line.checked_sub(1)
    }

    fn current_text(&mut self) -> &mut String {
        match self.line.checked_sub(1) {
            Some(row) => {
                let column = self.column;
                self.rows[row].field_mut(column)
            }
            None => &mut self.title,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.current_text().push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.current_text().pop();
    }

    pub fn up(&mut self) {
        self.line = self.line.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.line < self.rows.len() {
            self.line += 1;
        }
    }

    pub fn next_column(&mut self) {
        if !self.on_title() {
            self.column = self.column.next();
        }
    }

    pub fn prev_column(&mut self) {
        if !self.on_title() {
            self.column = self.column.prev();
        }
    }

    /// New empty row below the selection, which moves onto it.
    pub fn add_row(&mut self) {
        let at = self.line.min(self.rows.len());
        self.rows.insert(at, SegmentRow::default());
        self.line = at + 1;
        self.column = FormColumn::Description;
    }

    pub fn remove_row(&mut self) {
        if let Some(row) = self.selected_row() {
            self.rows.remove(row);
            self.line = self.line.min(self.rows.len());
        }
    }

    /// Parse and validate every field; nothing is applied on error.
    pub fn submit(&self) -> Result<Category> {
        let segments = self
            .rows
            .iter()
            .map(SegmentRow::to_segment)
            .collect::<Result<Vec<_>>>()?;
        let category = Category {
            title: self.title.trim().to_string(),
            segments,
        };
        category.validate()?;
        Ok(category)
    }
}
