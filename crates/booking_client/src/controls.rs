//! Field handles the controller renders into.
//!
//! A UI layer implements [`SelectControl`] and [`InputControl`] over its own
//! widgets; [`MemorySelect`] and [`MemoryInput`] keep everything in memory for
//! headless drivers and tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::SelectOption;

pub trait SelectControl: Send + Sync {
    /// Replaces every option and drops the current selection.
    fn replace_options(&self, options: &[SelectOption]);
    fn set_enabled(&self, enabled: bool);
    /// Shows or hides the inline error indicator.
    fn set_error(&self, error: Option<&str>);
}

pub trait InputControl: Send + Sync {
    fn clear(&self);
    fn set_enabled(&self, enabled: bool);
}

#[derive(Clone)]
pub struct FormControls {
    pub doctor: Arc<dyn SelectControl>,
    pub date: Arc<dyn InputControl>,
    pub time: Arc<dyn SelectControl>,
}

/// Concrete handles returned by [`FormControls::in_memory`].
#[derive(Clone)]
pub struct MemoryControls {
    pub doctor: Arc<MemorySelect>,
    pub date: Arc<MemoryInput>,
    pub time: Arc<MemorySelect>,
}

impl FormControls {
    pub fn in_memory() -> (Self, MemoryControls) {
        let memory = MemoryControls {
            doctor: Arc::new(MemorySelect::default()),
            date: Arc::new(MemoryInput::default()),
            time: Arc::new(MemorySelect::default()),
        };
        let controls = Self {
            doctor: memory.doctor.clone(),
            date: memory.date.clone(),
            time: memory.time.clone(),
        };
        (controls, memory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectSnapshot {
    pub options: Vec<SelectOption>,
    pub enabled: bool,
    pub error: Option<String>,
}

impl SelectSnapshot {
    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

#[derive(Debug, Default)]
pub struct MemorySelect {
    inner: Mutex<SelectSnapshot>,
}

impl MemorySelect {
    fn lock(&self) -> MutexGuard<'_, SelectSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SelectSnapshot {
        self.lock().clone()
    }
}

impl SelectControl for MemorySelect {
    fn replace_options(&self, options: &[SelectOption]) {
        self.lock().options = options.to_vec();
    }

    fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    fn set_error(&self, error: Option<&str>) {
        self.lock().error = error.map(str::to_string);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub enabled: bool,
    pub cleared_count: u32,
}

#[derive(Debug, Default)]
pub struct MemoryInput {
    inner: Mutex<InputSnapshot>,
}

impl MemoryInput {
    fn lock(&self) -> MutexGuard<'_, InputSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        *self.lock()
    }
}

impl InputControl for MemoryInput {
    fn clear(&self) {
        self.lock().cleared_count += 1;
    }

    fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }
}
