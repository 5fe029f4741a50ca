//! Rows shown by one presentation (table or grid)

use std::ops::Range;

use super::diff::SnapshotDiff;
use super::store::{ResultSnapshot, RESULTS_SECTION};
use super::thumbnail::RowImage;
use super::types::{Item, ItemId};

#[derive(Clone, Debug)]
pub struct PresentedRow {
    pub item: Item,
    pub image: RowImage,
}

/// What an apply did to the row positions
#[derive(Clone, Debug, Default)]
pub struct RowChanges {
    pub diff: SnapshotDiff,
    /// Indices whose occupant differs from before the apply
    pub reassigned: Vec<usize>,
    /// Indices that existed before the apply and no longer do
    pub dropped: Range<usize>,
}

/// Rendering surface state for one presentation.
///
/// `stride` is how many rows share one visual line: 1 for the table, the
/// column count for the grid. Scrolling moves in whole lines.
#[derive(Clone, Debug)]
pub struct PresentedList {
    rows: Vec<PresentedRow>,
    section: &'static str,
    snapshot_id: u64,
    selected: usize,
    first_line: usize,
    visible_lines: usize,
    stride: usize,
}

impl PresentedList {
    pub fn new(stride: usize) -> Self {
        Self {
            rows: Vec::new(),
            section: RESULTS_SECTION,
            snapshot_id: 0,
            selected: 0,
            first_line: 0,
            visible_lines: 0,
            stride: stride.max(1),
        }
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.rows.iter().map(|row| row.item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Title of the section the rows belong to
    pub fn section(&self) -> &'static str {
        self.section
    }

    #[cfg(test)]
    pub fn snapshot_id(&self) -> u64 {
        self.snapshot_id
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn row(&self, index: usize) -> Option<&PresentedRow> {
        self.rows.get(index)
    }

    #[cfg(test)]
    pub fn image(&self, index: usize) -> Option<RowImage> {
        self.rows.get(index).map(|row| row.image)
    }

    pub fn set_image(&mut self, index: usize, image: RowImage) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.image = image;
                true
            }
            None => false,
        }
    }

    /// Replace the rows with `snapshot`, carrying moved rows (and their
    /// images) to their new positions.
    pub fn apply(&mut self, snapshot: &ResultSnapshot) -> RowChanges {
        let before = self.ids();
        let after = snapshot.ids();
        let diff = SnapshotDiff::between(&before, &after);

        let rows = std::mem::take(&mut self.rows);
        self.rows = diff.apply(rows, |j| PresentedRow {
            item: snapshot.items[j].clone(),
            image: RowImage::Placeholder,
        });
        self.snapshot_id = snapshot.id;
        self.section = snapshot.section;

        let reassigned = after
            .iter()
            .enumerate()
            .filter(|(i, id)| before.get(*i) != Some(*id))
            .map(|(i, _)| i)
            .collect();
        let dropped = after.len().min(before.len())..before.len();

        self.clamp_selection();

        RowChanges {
            diff,
            reassigned,
            dropped,
        }
    }

    /// Index range currently on screen
    pub fn visible_range(&self) -> Range<usize> {
        let start = (self.first_line * self.stride).min(self.rows.len());
        let end = ((self.first_line + self.visible_lines) * self.stride).min(self.rows.len());
        start..end
    }

    /// Returns whether the viewport size changed
    pub fn set_visible_lines(&mut self, lines: usize) -> bool {
        if self.visible_lines == lines {
            return false;
        }
        self.visible_lines = lines;
        self.scroll_to_selection();
        true
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.scroll_to_selection();
    }

    /// Move by whole visual lines (one line is `stride` rows)
    pub fn move_lines(&mut self, lines: isize) {
        self.move_selection(lines * self.stride as isize);
    }

    pub fn page(&mut self, forward: bool) {
        let lines = self.visible_lines.max(1) as isize;
        self.move_lines(if forward { lines } else { -lines });
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.scroll_to_selection();
    }

    fn scroll_to_selection(&mut self) {
        let line = self.selected / self.stride;
        let total_lines = self.rows.len().div_ceil(self.stride);
        if line < self.first_line {
            self.first_line = line;
        } else if self.visible_lines > 0 && line >= self.first_line + self.visible_lines {
            self.first_line = line + 1 - self.visible_lines;
        }
        self.first_line = self
            .first_line
            .min(total_lines.saturating_sub(self.visible_lines.max(1)));
    }
}
