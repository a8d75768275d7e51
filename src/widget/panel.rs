//! A plain container, optionally framed with a title bar.

use trellis_controls::Label;
use trellis_core::{Constraint, Layout, NodeId, Ui, UiError, Widget};
use trellis_layout::FlowLayout;

/// A `div` laid out with a [`FlowLayout`] unless told otherwise.
///
/// A titled panel is a framed column holding a title bar and a content
/// panel. Children added through [`Panel::add`] go into the content panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    id: NodeId,
    content: NodeId,
}

impl Widget for Panel {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Panel {
    /// Creates an empty panel.
    pub fn new(ui: &mut Ui) -> Self {
        let id = ui
            .create_widget("div")
            .layout(FlowLayout::default())
            .id();
        Self { id, content: id }
    }

    /// Creates a bordered panel with a bold title bar above its content.
    pub fn titled(ui: &mut Ui, title: &str) -> Self {
        let frame = Self::new(ui);
        let _ = ui.node(frame.id).border("1px solid #ccc").styles([
            ("border-radius", "4px"),
            ("overflow", "hidden"),
            ("flex-direction", "column"),
            ("flex-wrap", "nowrap"),
        ]);

        let caption = Label::new(ui, title);
        let bar = Self::new(ui);
        let _ = ui
            .node(bar.id)
            .background("#f5f5f5")
            .padding("8px 12px")
            .style("border-bottom", "1px solid #ccc")
            .font_weight("bold");

        let content = Self::new(ui);
        let _ = ui.node(content.id).padding("12px");

        let assembled = ui
            .add_child(bar.id, caption.id())
            .and_then(|()| ui.add_child(frame.id, bar.id))
            .and_then(|()| ui.add_child(frame.id, content.id));
        if let Err(error) = assembled {
            tracing::warn!(%error, "could not assemble titled panel");
        }

        Self {
            id: frame.id,
            content: content.id,
        }
    }

    /// The node children are added to.
    #[must_use]
    pub const fn content(&self) -> NodeId {
        self.content
    }

    /// Returns `true` for panels built by [`Panel::titled`].
    #[must_use]
    pub fn is_titled(&self) -> bool {
        self.id != self.content
    }

    /// Adds a child to the content.
    ///
    /// # Errors
    ///
    /// Fails if either node is unknown or the child is an ancestor of the panel.
    pub fn add(&self, ui: &mut Ui, child: &impl Widget) -> Result<&Self, UiError> {
        ui.add_child(self.content, child.id())?;
        Ok(self)
    }

    /// Adds a child placed by the content's layout according to `constraint`.
    ///
    /// # Errors
    ///
    /// See [`Panel::add`].
    pub fn add_with(
        &self,
        ui: &mut Ui,
        child: &impl Widget,
        constraint: impl Into<Constraint>,
    ) -> Result<&Self, UiError> {
        ui.add_child_with(self.content, child.id(), constraint)?;
        Ok(self)
    }

    /// Replaces the content's layout. Children already added keep their placement.
    ///
    /// # Errors
    ///
    /// Fails if the panel was destroyed.
    pub fn set_layout(&self, ui: &mut Ui, layout: impl Layout + 'static) -> Result<&Self, UiError> {
        ui.set_layout(self.content, layout)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::{MemoryDom, Region, Ui};
    use trellis_layout::{BorderLayout, FlowLayout};

    use super::Panel;

    #[test]
    fn plain_panels_flow() {
        let mut ui = Ui::new(MemoryDom::new());
        let panel = Panel::new(&mut ui);

        assert!(!panel.is_titled());
        assert!(ui.layout::<FlowLayout>(panel.content()).is_some());
        assert_eq!(ui.style(panel.content(), "display"), Some("flex"));
        assert_eq!(ui.style(panel.content(), "flex-wrap"), Some("wrap"));
    }

    #[test]
    fn titled_panels_add_into_their_content() {
        let mut ui = Ui::new(MemoryDom::new());
        let panel = Panel::titled(&mut ui, "Totals");
        let item = ui.create("span").text("42").id();
        panel.add(&mut ui, &item).unwrap();

        let frame = ui.children(panel.content).len();
        assert_eq!(frame, 1);
        let [bar, content] = ui.children(panel.id) else {
            panic!("expected a title bar and a content panel");
        };
        assert_eq!(*content, panel.content());
        let caption = ui.children(*bar)[0];
        assert_eq!(ui.text(caption), Some("Totals"));
        assert_eq!(ui.style(*bar, "font-weight"), Some("bold"));
        assert_eq!(ui.parent(item), Some(panel.content()));
    }

    #[test]
    fn layout_can_be_swapped() {
        let mut ui = Ui::new(MemoryDom::new());
        let panel = Panel::new(&mut ui);
        panel.set_layout(&mut ui, BorderLayout::new()).unwrap();
        let north = ui.create("header").id();
        panel.add_with(&mut ui, &north, Region::North).unwrap();

        assert_eq!(ui.style(north, "grid-area"), Some("north"));
        assert_eq!(ui.style(panel.content(), "display"), Some("grid"));
    }

    #[test]
    fn renders_title_before_content() {
        let mut ui = Ui::new(MemoryDom::new());
        let panel = Panel::titled(&mut ui, "T");
        let body = ui.body();
        let element = ui.render(panel.id, body).unwrap();

        let html = ui.dom().outer_html(element).unwrap();
        let title = html.find(">T<").unwrap();
        let content = html.find("padding: 12px").unwrap();
        assert!(title < content);
    }
}
