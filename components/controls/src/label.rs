//! Static text.

use trellis_core::{NodeId, Ui, Widget};

/// An inline-block `<span>` of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    id: NodeId,
}

impl Widget for Label {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Label {
    /// Creates a label showing `text`.
    pub fn new(ui: &mut Ui, text: &str) -> Self {
        let id = ui
            .create_widget("span")
            .text(text)
            .style("display", "inline-block")
            .id();
        Self { id }
    }

    /// Styles the label as a heading. `level` is clamped to `1..=6`.
    pub fn heading(self, ui: &mut Ui, level: u8) -> Self {
        let level = u32::from(level.clamp(1, 6));
        let _ = ui
            .node(self.id)
            .font_size(24 - level * 2)
            .font_weight("bold")
            .margin("0.5em 0");
        self
    }

    /// Bold text.
    pub fn bold(self, ui: &mut Ui) -> Self {
        let _ = ui.node(self.id).font_weight("bold");
        self
    }

    /// Italic text.
    pub fn italic(self, ui: &mut Ui) -> Self {
        let _ = ui.node(self.id).style("font-style", "italic");
        self
    }

    /// Underlined text.
    pub fn underline(self, ui: &mut Ui) -> Self {
        let _ = ui.node(self.id).style("text-decoration", "underline");
        self
    }

    /// Replaces the text.
    pub fn set_text(self, ui: &mut Ui, text: &str) -> Self {
        let _ = ui.node(self.id).text(text);
        self
    }

    /// The current text.
    #[must_use]
    pub fn text(self, ui: &Ui) -> &str {
        ui.text(self.id).unwrap_or_default()
    }
}

/// Creates a [`Label`].
pub fn label(ui: &mut Ui, text: &str) -> Label {
    Label::new(ui, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::MemoryDom;

    #[test]
    fn heading_levels_are_clamped() {
        let mut ui = Ui::new(MemoryDom::new());
        for (level, size) in [(0, "22px"), (1, "22px"), (3, "18px"), (6, "12px"), (9, "12px")] {
            let heading = label(&mut ui, "Title").heading(&mut ui, level);
            assert_eq!(ui.style(heading.id(), "font-size"), Some(size));
            assert_eq!(ui.style(heading.id(), "font-weight"), Some("bold"));
        }
    }

    #[test]
    fn decorations_stack() {
        let mut ui = Ui::new(MemoryDom::new());
        let label = Label::new(&mut ui, "note").italic(&mut ui).underline(&mut ui);

        assert_eq!(ui.style(label.id(), "display"), Some("inline-block"));
        assert_eq!(ui.style(label.id(), "font-style"), Some("italic"));
        assert_eq!(ui.style(label.id(), "text-decoration"), Some("underline"));
        assert_eq!(label.set_text(&mut ui, "done").text(&ui), "done");
    }
}
