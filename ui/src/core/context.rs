//! Application context constructed once at startup by the platform shell.
//!
//! Components reach the dataset source and the shared counter store through
//! this context instead of a module-level handle, so each shell decides what
//! backs them (the web shell bundles the dataset and an in-process counter
//! store; tests construct their own).

use std::rc::Rc;
use std::sync::Arc;

use crate::data::source::DatasetSource;
use crate::vote::store::MemoryCounterStore;

#[derive(Clone)]
pub struct AppContext {
    pub dataset: Rc<dyn DatasetSource>,
    pub counters: Arc<MemoryCounterStore>,
}

impl AppContext {
    pub fn new(dataset: Rc<dyn DatasetSource>, counters: Arc<MemoryCounterStore>) -> Self {
        Self { dataset, counters }
    }
}
