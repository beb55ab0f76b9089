//! Tab projection of the board contents.

use crate::models::{AirlineList, AirlineRecord};

/// Board tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardTab {
    #[default]
    All,
    American,
    Foreign,
}

impl BoardTab {
    pub const ALL_TABS: [BoardTab; 3] = [BoardTab::All, BoardTab::American, BoardTab::Foreign];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            BoardTab::All => "All",
            BoardTab::American => "American",
            BoardTab::Foreign => "Foreign",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            BoardTab::All => BoardTab::American,
            BoardTab::American => BoardTab::Foreign,
            BoardTab::Foreign => BoardTab::All,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            BoardTab::All => BoardTab::Foreign,
            BoardTab::American => BoardTab::All,
            BoardTab::Foreign => BoardTab::American,
        }
    }

    /// Whether a slot is shown under this tab. Empty slots only appear
    /// under `All`.
    pub fn includes(&self, slot: Option<&AirlineRecord>) -> bool {
        match self {
            BoardTab::All => true,
            BoardTab::American => slot.is_some_and(AirlineRecord::is_us),
            BoardTab::Foreign => slot.is_some_and(AirlineRecord::is_foreign),
        }
    }
}

/// Project `airlines` through `tab`, keeping list order.
pub fn filter_airlines(airlines: &AirlineList, tab: BoardTab) -> Vec<Option<&AirlineRecord>> {
    airlines.iter().filter(|slot| tab.includes(*slot)).collect()
}
