//! Session history backends.

/// A stack of visited paths.
///
/// The browser implementation lives in the web backend; [`MemoryHistory`]
/// keeps the stack in memory.
pub trait History {
    /// The path of the current entry.
    fn current_path(&self) -> String;

    /// Adds an entry after the current one, discarding any forward entries.
    fn push(&mut self, path: &str);

    /// Moves one entry back, if possible.
    fn back(&mut self);

    /// Moves one entry forward, if possible.
    fn forward(&mut self);
}

/// An in-memory [`History`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    /// Creates a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Position of the current entry.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_else(|| String::from("/"))
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_owned());
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    fn forward(&mut self) {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
    }
}
