//! Page bookkeeping: deletion marks, parity partition and the active view

use crate::types::*;

/// The pages of the open document plus the view-mode state machine
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: Vec<PageInfo>,
    mode: ViewMode,
    /// Overlay mode to return to when a single-page preview is closed
    overlay_mode: ViewMode,
}

impl PageSet {
    /// Build a page set; indices are rewritten to match positions
    pub fn new(mut pages: Vec<PageInfo>) -> Self {
        for (index, page) in pages.iter_mut().enumerate() {
            page.index = index;
        }
        Self {
            pages,
            mode: ViewMode::default(),
            overlay_mode: ViewMode::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    pub fn get(&self, index: usize) -> Result<&PageInfo> {
        self.pages.get(index).ok_or(CropError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut PageInfo> {
        let count = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(CropError::PageOutOfRange { index, count })
    }

    /// Flip the deletion mark of a page, returning the new state
    pub fn toggle_marked(&mut self, index: usize) -> Result<bool> {
        let page = self.get_mut(index)?;
        page.marked_for_deletion = !page.marked_for_deletion;
        Ok(page.marked_for_deletion)
    }

    pub fn set_marked(&mut self, index: usize, marked: bool) -> Result<()> {
        self.get_mut(index)?.marked_for_deletion = marked;
        Ok(())
    }

    pub fn is_marked(&self, index: usize) -> Result<bool> {
        Ok(self.get(index)?.marked_for_deletion)
    }

    /// Indices of all pages currently marked for deletion
    pub fn marked(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.marked_for_deletion)
            .map(|p| p.index)
            .collect()
    }

    /// Indices split into (odd, even) by 1-based position
    pub fn parity_partition(&self) -> (Vec<usize>, Vec<usize>) {
        self.pages
            .iter()
            .map(|p| p.index)
            .partition(|&i| Parity::of(i) == Parity::Odd)
    }

    /// Indices of the pages in `subset`, optionally without marked pages
    pub fn indices(&self, subset: PageSubset, skip_marked: bool) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| subset.contains(p.index))
            .filter(|p| !(skip_marked && p.marked_for_deletion))
            .map(|p| p.index)
            .collect()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// The overlay mode in effect, even while a single page is previewed
    pub fn overlay_mode(&self) -> ViewMode {
        self.overlay_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        if let ViewMode::SinglePreview(index) = mode {
            self.get(index)?;
        } else {
            self.overlay_mode = mode;
        }
        self.mode = mode;
        Ok(())
    }

    /// Preview `index` on its own, or go back to the overlay if it is
    /// already being previewed
    pub fn toggle_preview(&mut self, index: usize) -> Result<ViewMode> {
        self.get(index)?;
        self.mode = match self.mode {
            ViewMode::SinglePreview(current) if current == index => self.overlay_mode,
            _ => ViewMode::SinglePreview(index),
        };
        Ok(self.mode)
    }

    /// Panes the central area shows in the current mode, left to right
    pub fn panes(&self) -> Vec<Pane> {
        let composite = |subset, scope| Pane {
            source: PaneSource::Composite(subset),
            scope,
        };
        match self.mode {
            ViewMode::All => vec![composite(PageSubset::All, Scope::All)],
            ViewMode::Split => vec![
                composite(PageSubset::Odd, Scope::Odd),
                composite(PageSubset::Even, Scope::Even),
            ],
            ViewMode::OddOnly => vec![composite(PageSubset::Odd, Scope::Odd)],
            ViewMode::EvenOnly => vec![composite(PageSubset::Even, Scope::Even)],
            ViewMode::SinglePreview(index) => vec![Pane {
                source: PaneSource::Page(index),
                scope: self.scope_of(index),
            }],
        }
    }

    /// Rectangle scope a page is cropped with under the current overlay mode
    pub fn scope_of(&self, index: usize) -> Scope {
        if self.overlay_mode.is_parity() {
            Parity::of(index).into()
        } else {
            Scope::All
        }
    }

    /// Remove every marked page and re-index the survivors.
    ///
    /// Returns the removed indices (as they were before removal), in
    /// ascending order, so the document can drop the same pages.
    pub fn apply_deletion(&mut self) -> Vec<usize> {
        let removed = self.marked();
        if removed.is_empty() {
            return removed;
        }

        self.pages.retain(|p| !p.marked_for_deletion);
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.index = index;
        }

        if self.mode.is_preview() {
            self.mode = self.overlay_mode;
        }
        removed
    }
}
