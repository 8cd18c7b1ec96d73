//! Clipboard handle.
//!
//! The last-resort delivery channel: when nothing can write into the page,
//! the text still reaches the user here.

/// The host clipboard, modeled as a single text slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Clipboard {
    contents: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into());
    }

    pub fn read(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }
}
