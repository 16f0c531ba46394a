#![allow(dead_code)] // each test binary compiles its own view of this module

use std::any::Any;
use std::sync::{Arc, Mutex};

use hookline::{HostObject, Value};

// ============================================================================
// Shared call log
// ============================================================================

/// Records which handlers ran and what buffers they observed.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tag: &str, buffer: &[Value]) {
        self.entries
            .lock()
            .unwrap()
            .push((tag.to_string(), buffer.to_vec()));
    }

    pub fn tags(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    pub fn buffers(&self) -> Vec<Vec<Value>> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, buffer)| buffer.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

// ============================================================================
// Test host objects
// ============================================================================

pub struct Player {
    pub name: &'static str,
}

impl HostObject for Player {
    fn type_name(&self) -> &'static str {
        "Player"
    }

    fn type_names(&self) -> Vec<&'static str> {
        vec!["Player", "Entity"]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Item;

impl HostObject for Item {
    fn type_name(&self) -> &'static str {
        "Item"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
