//! Render-side state of the airline board.
//!
//! `BoardState` holds the displayed list, the loading flag and the selected
//! tab. It starts empty and loading, and changes only through its update
//! functions.

use crate::filter::{filter_airlines, BoardTab};
use crate::models::{AirlineList, AirlineRecord};
use crate::sync::SyncEvent;

/// What one grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView<'a> {
    /// Skeleton shown while loading or for an empty slot
    Placeholder,
    Airline(&'a AirlineRecord),
}

impl CardView<'_> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CardView::Placeholder)
    }
}

#[derive(Debug, Clone)]
pub struct BoardState {
    airlines: AirlineList,
    loading: bool,
    selected_tab: BoardTab,
}

impl BoardState {
    /// An empty board with `slots` placeholders, loading, on the `All` tab.
    pub fn new(slots: usize) -> Self {
        Self {
            airlines: AirlineList::empty(slots),
            loading: true,
            selected_tab: BoardTab::All,
        }
    }

    pub fn airlines(&self) -> &AirlineList {
        &self.airlines
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_tab(&self) -> BoardTab {
        self.selected_tab
    }

    /// Replace the displayed list with a cycle's result and clear the
    /// loading flag. The board keeps its slot count.
    pub fn apply(&mut self, event: SyncEvent) {
        let slots = self.airlines.len();
        self.airlines = event.into_airlines().resized(slots);
        self.loading = false;
    }

    pub fn select_tab(&mut self, tab: BoardTab) {
        self.selected_tab = tab;
    }

    /// Cards for the selected tab, in list order.
    pub fn cards(&self) -> Vec<CardView<'_>> {
        filter_airlines(&self.airlines, self.selected_tab)
            .into_iter()
            .map(|slot| match slot {
                Some(record) if !self.loading => CardView::Airline(record),
                _ => CardView::Placeholder,
            })
            .collect()
    }
}
