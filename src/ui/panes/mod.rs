//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and current line indicator
//! - [`vm`]: Generated instruction listing with the selected instruction highlighted
//! - [`status`]: Status bar with keybindings and position
//!
//! Each pane module exports a primary `render_*` function. Both scrolling panes
//! share [`ScrollState`], which keeps the highlighted row at a fixed visual
//! position while the selection moves.

pub mod source;
pub mod status;
pub mod vm;

pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use vm::render_vm_pane;

/// Scroll state for a pane that follows a highlighted row
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub offset: usize,
    /// Visual row the highlighted item is pinned to (None = center on first render)
    pub target_row: Option<usize>,
}

impl ScrollState {
    /// Recompute `offset` so that item `current` (0-based) sits on the target row.
    pub fn follow(&mut self, current: usize, total: usize, visible_height: usize) {
        let target_row = self
            .target_row
            .unwrap_or(visible_height / 2)
            .min(visible_height.saturating_sub(1));
        self.target_row = Some(target_row);

        if total > visible_height {
            let max_scroll = total - visible_height;
            self.offset = current.saturating_sub(target_row).min(max_scroll);
        } else {
            self.offset = 0;
        }
    }

    /// Scrolling up makes the highlighted row move down visually.
    pub fn scroll_up(&mut self) {
        if let Some(row) = self.target_row {
            self.target_row = Some(row.saturating_add(1));
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(row) = self.target_row {
            self.target_row = Some(row.saturating_sub(1));
        }
    }
}
