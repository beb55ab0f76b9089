//! Application state management for airboard.
//!
//! `App` owns the board state, the UI selection and the receiving end of the
//! synchronizer channel. The synchronizer runs in a background task and is
//! cancelled when the `App` is dropped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use airboard_core::{
    AirlineClient, AirlineLookup, BoardHandle, BoardState, BoardTab, CacheManager, CardView,
    Config, SyncEvent, Synchronizer,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the synchronizer channel.
/// One event per cycle; the UI drains it every frame.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

/// Main application state container
pub struct App {
    pub board: BoardState,
    pub state: AppState,

    /// Index into the cards of the selected tab
    pub selection: usize,

    pub status_message: Option<String>,
    pub cache_age: Option<String>,

    cache: CacheManager,
    sync_rx: mpsc::Receiver<SyncEvent>,
    sync_handle: BoardHandle,
}

impl App {
    /// Create the app and start the synchronizer against the lookup service.
    /// Must be called from within the Tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let lookup = AirlineClient::new(&config.api_base_url, config.request_timeout())?;
        debug!(base_url = lookup.base_url(), "Lookup client configured");
        Self::with_lookup(config, Arc::new(lookup))
    }

    pub fn with_lookup(config: Config, lookup: Arc<dyn AirlineLookup>) -> Result<Self> {
        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let codes = config.airline_codes();
        let board = BoardState::new(codes.len());

        let synchronizer = Synchronizer::new(lookup, CacheManager::new(cache_dir.clone())?, codes);
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let sync_handle = synchronizer.spawn(config.refresh_interval(), tx);
        info!(
            period_secs = config.refresh_interval().as_secs(),
            "Synchronizer started"
        );

        let cache = CacheManager::new(cache_dir)?;
        let cache_age = cache.airlines_age();

        Ok(Self {
            board,
            state: AppState::Normal,
            selection: 0,
            status_message: None,
            cache_age,
            cache,
            sync_rx: rx,
            sync_handle,
        })
    }

    // =========================================================================
    // Background Sync
    // =========================================================================

    /// Apply every cycle result published since the last frame.
    pub fn check_background_tasks(&mut self) {
        let mut received = false;
        while let Ok(event) = self.sync_rx.try_recv() {
            self.process_sync_event(event);
            received = true;
        }
        if received {
            self.cache_age = self.cache.airlines_age();
            self.selection = clamp_selection(self.selection, self.visible_count());
        }
    }

    fn process_sync_event(&mut self, event: SyncEvent) {
        match &event {
            SyncEvent::FromCache(airlines) => {
                debug!(loaded = airlines.loaded_count(), "Board loaded from cache");
                self.status_message = None;
            }
            SyncEvent::Fetched { airlines, matched } => {
                debug!(matched = matched, total = airlines.len(), "Board refreshed");
                self.status_message = if *matched == 0 {
                    Some("Lookup service unavailable".to_string())
                } else {
                    None
                };
            }
        }
        self.board.apply(event);
    }

    /// Delete the cache entry so the next cycle looks everything up again.
    pub fn clear_cache(&mut self) {
        match self.cache.clear_airlines() {
            Ok(true) => {
                info!("Airline cache cleared");
                self.status_message = Some("Cache cleared - refreshing on next cycle".to_string());
            }
            Ok(false) => {
                self.status_message = Some("Cache already empty".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear airline cache");
                self.status_message = Some(format!("Failed to clear cache: {}", e));
            }
        }
        self.cache_age = self.cache.airlines_age();
    }

    pub fn stop_sync(&self) {
        self.sync_handle.shutdown();
    }

    // =========================================================================
    // Tabs and Selection
    // =========================================================================

    pub fn select_tab(&mut self, tab: BoardTab) {
        if self.board.selected_tab() != tab {
            self.board.select_tab(tab);
            self.selection = 0;
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.board.selected_tab().next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.board.selected_tab().prev());
    }

    pub fn visible_count(&self) -> usize {
        self.board.cards().len()
    }

    /// Move the card selection by `delta`, staying within the visible cards.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.visible_count();
        if count == 0 {
            self.selection = 0;
            return;
        }
        let target = self.selection as isize + delta;
        self.selection = target.clamp(0, count as isize - 1) as usize;
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.visible_count().saturating_sub(1);
    }

    pub fn selected_card(&self) -> Option<CardView<'_>> {
        self.board.cards().get(self.selection).copied()
    }
}

/// Keep a selection index inside `0..len` (0 when empty).
pub fn clamp_selection(selection: usize, len: usize) -> usize {
    selection.min(len.saturating_sub(1))
}

// ============================================================================
// Tests
// ============================================================================
