use std::sync::{Mutex, PoisonError};

/// Latest successful answer, kept until the next successful question.
#[derive(Default)]
pub struct ResultStore {
    answer: Mutex<Option<String>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.answer.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }

    pub fn get(&self) -> Option<String> {
        self.answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
