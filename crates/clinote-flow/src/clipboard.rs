/// Platform clipboard capability.
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// Keeps the last copied text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}
