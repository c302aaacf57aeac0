//! The snapshot holder — loaded-ness is a property of the data itself.
//!
//! Readers take an `Arc` clone of the current snapshot and query it without
//! any lock held; a reload builds the complete replacement off-lock and swaps
//! the reference. A reader can therefore never observe a half-replaced table.

use std::sync::Arc;

use aula_core::snapshot::TableSnapshot;
use parking_lot::RwLock;

/// Whether a planning table has been loaded into the process yet.
#[derive(Debug)]
pub enum TableState {
  Unloaded,
  Loaded(Arc<TableSnapshot>),
}

#[derive(Debug)]
pub struct SnapshotHolder {
  state: RwLock<TableState>,
}

impl SnapshotHolder {
  pub fn new() -> Self {
    Self { state: RwLock::new(TableState::Unloaded) }
  }

  /// The current snapshot, or `None` while unloaded.
  pub fn snapshot(&self) -> Option<Arc<TableSnapshot>> {
    match &*self.state.read() {
      TableState::Loaded(snapshot) => Some(Arc::clone(snapshot)),
      TableState::Unloaded => None,
    }
  }

  /// Replace the current snapshot wholesale.
  pub fn install(&self, snapshot: TableSnapshot) {
    *self.state.write() = TableState::Loaded(Arc::new(snapshot));
  }

  pub fn is_loaded(&self) -> bool {
    matches!(&*self.state.read(), TableState::Loaded(_))
  }
}

impl Default for SnapshotHolder {
  fn default() -> Self {
    Self::new()
  }
}
