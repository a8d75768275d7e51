//! Tabbed container.

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::{debug, warn};
use trellis_controls::Label;
use trellis_core::{NodeId, Ui, UiError, Widget};

type TabListener = Rc<dyn Fn(&mut Ui, usize)>;

#[derive(Debug, Clone)]
struct Tab {
    title: String,
    content: NodeId,
}

#[derive(Default)]
struct Model {
    tabs: Vec<Tab>,
    selected: usize,
    listener: Option<TabListener>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("tabs", &self.tabs)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

/// A row of tab headers above the content of the selected tab.
///
/// Tab contents that are not shown stay detached but alive, so switching back
/// shows the same nodes again.
#[derive(Debug, Clone)]
pub struct TabPane {
    id: NodeId,
    model: Rc<RefCell<Model>>,
}

impl Widget for TabPane {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl TabPane {
    /// Creates a pane without tabs.
    pub fn new(ui: &mut Ui) -> Self {
        let id = ui
            .create_widget("div")
            .styles([
                ("display", "flex"),
                ("flex-direction", "column"),
                ("width", "100%"),
                ("height", "100%"),
            ])
            .id();
        let pane = Self {
            id,
            model: Rc::new(RefCell::new(Model::default())),
        };
        pane.refresh(ui);
        pane
    }

    /// Appends a tab.
    pub fn add_tab(&self, ui: &mut Ui, title: &str, content: &impl Widget) -> &Self {
        self.model.borrow_mut().tabs.push(Tab {
            title: title.to_owned(),
            content: content.id(),
        });
        self.refresh(ui);
        self
    }

    /// Removes a tab and returns its content, which is detached but not destroyed.
    ///
    /// The selection moves to the last tab if it fell off the end.
    pub fn remove_tab(&self, ui: &mut Ui, index: usize) -> Option<NodeId> {
        let removed = {
            let mut model = self.model.borrow_mut();
            if index >= model.tabs.len() {
                return None;
            }
            let removed = model.tabs.remove(index);
            if model.selected >= model.tabs.len() {
                model.selected = model.tabs.len().saturating_sub(1);
            }
            removed
        };
        if ui.parent(removed.content).is_some() {
            if let Err(error) = ui.remove_from_parent(removed.content) {
                warn!(%error, "could not detach removed tab");
            }
        }
        self.refresh(ui);
        Some(removed.content)
    }

    /// Number of tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.model.borrow().tabs.len()
    }

    /// Title of a tab.
    #[must_use]
    pub fn title(&self, index: usize) -> Option<String> {
        self.model
            .borrow()
            .tabs
            .get(index)
            .map(|tab| tab.title.clone())
    }

    /// Index of the selected tab. `0` when there are no tabs.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.model.borrow().selected
    }

    /// Content of the selected tab.
    #[must_use]
    pub fn selected_content(&self) -> Option<NodeId> {
        let model = self.model.borrow();
        model.tabs.get(model.selected).map(|tab| tab.content)
    }

    /// Selects a tab and notifies the listener.
    ///
    /// Out-of-range indices and the already selected tab are ignored.
    pub fn set_selected_index(&self, ui: &mut Ui, index: usize) -> &Self {
        let listener = {
            let mut model = self.model.borrow_mut();
            if index >= model.tabs.len() || index == model.selected {
                return self;
            }
            model.selected = index;
            model.listener.clone()
        };
        debug!(pane = %self.id, index, "tab selected");
        self.refresh(ui);
        if let Some(listener) = listener {
            listener(ui, index);
        }
        self
    }

    /// Called with the new index whenever the selection changes.
    pub fn on_tab_change(&self, listener: impl Fn(&mut Ui, usize) + 'static) -> &Self {
        self.model.borrow_mut().listener = Some(Rc::new(listener));
        self
    }

    fn refresh(&self, ui: &mut Ui) {
        if let Err(error) = self.rebuild(ui) {
            warn!(pane = %self.id, %error, "could not rebuild tabs");
        }
    }

    fn rebuild(&self, ui: &mut Ui) -> Result<(), UiError> {
        let (tabs, selected) = {
            let model = self.model.borrow();
            (model.tabs.clone(), model.selected)
        };

        // Keep tab contents alive across the rebuild.
        for tab in &tabs {
            if ui.parent(tab.content).is_some() {
                ui.remove_from_parent(tab.content)?;
            }
        }
        ui.clear(self.id)?;

        let header = ui
            .create("div")
            .style("display", "flex")
            .style("border-bottom", "1px solid #dadce0")
            .id();
        for (index, tab) in tabs.iter().enumerate() {
            let button = self.tab_button(ui, index, index == selected);
            let caption = Label::new(ui, &tab.title);
            ui.add_child(button, caption.id())?;
            ui.add_child(header, button)?;
        }

        let area = ui
            .create("div")
            .style("flex", "1")
            .style("overflow", "auto")
            .padding("16px")
            .id();
        if let Some(tab) = tabs.get(selected) {
            ui.add_child(area, tab.content)?;
        }

        ui.add_child(self.id, header)?;
        ui.add_child(self.id, area)
    }

    fn tab_button(&self, ui: &mut Ui, index: usize, selected: bool) -> NodeId {
        let button = ui
            .create("div")
            .styles([
                ("padding", "10px 16px"),
                ("cursor", "pointer"),
                ("user-select", "none"),
                ("transition", "background-color 0.2s"),
            ])
            .id();

        if selected {
            let _ = ui
                .node(button)
                .style("border-bottom", "2px solid #4285f4")
                .foreground("#4285f4")
                .font_weight("500");
        } else {
            let _ = ui
                .node(button)
                .style("border-bottom", "2px solid transparent")
                .foreground("#5f6368")
                .on("mouseover", move |ui, _| {
                    let _ = ui.node(button).background("#f1f3f4");
                })
                .on("mouseout", move |ui, _| {
                    let _ = ui.node(button).background("transparent");
                });
        }

        let pane = self.clone();
        let _ = ui.node(button).on("click", move |ui, _| {
            pane.set_selected_index(ui, index);
        });
        button
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use trellis_core::{MemoryDom, NodeId, Ui};

    use super::TabPane;

    fn pane_with(ui: &mut Ui, titles: &[&str]) -> (TabPane, Vec<NodeId>) {
        let pane = TabPane::new(ui);
        let contents: Vec<NodeId> = titles
            .iter()
            .map(|title| ui.create("p").text(format!("{title} body")).id())
            .collect();
        for (title, content) in titles.iter().zip(&contents) {
            pane.add_tab(ui, title, content);
        }
        (pane, contents)
    }

    fn header_buttons(ui: &Ui, pane: &TabPane) -> Vec<NodeId> {
        let header = ui.children(pane.id)[0];
        ui.children(header).to_vec()
    }

    fn shown(ui: &Ui, pane: &TabPane) -> Option<NodeId> {
        let area = ui.children(pane.id)[1];
        ui.children(area).first().copied()
    }

    #[test]
    fn first_tab_is_shown() {
        let mut ui = Ui::new(MemoryDom::new());
        let (pane, contents) = pane_with(&mut ui, &["One", "Two"]);

        assert_eq!(pane.tab_count(), 2);
        assert_eq!(pane.selected_index(), 0);
        assert_eq!(shown(&ui, &pane), Some(contents[0]));
        let buttons = header_buttons(&ui, &pane);
        assert_eq!(ui.style(buttons[0], "color"), Some("#4285f4"));
        assert_eq!(ui.style(buttons[1], "color"), Some("#5f6368"));
    }

    #[test]
    fn clicking_a_header_switches_tabs() {
        let mut ui = Ui::new(MemoryDom::new());
        let (pane, contents) = pane_with(&mut ui, &["One", "Two", "Three"]);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        pane.on_tab_change(move |_, index| sink.borrow_mut().push(index));

        let second = header_buttons(&ui, &pane)[1];
        ui.emit(second, "click");

        assert_eq!(pane.selected_index(), 1);
        assert_eq!(shown(&ui, &pane), Some(contents[1]));
        // The first tab's content survives being hidden.
        assert!(ui.contains(contents[0]));
        assert_eq!(ui.parent(contents[0]), None);

        // Clicking the selected tab again does nothing.
        let second = header_buttons(&ui, &pane)[1];
        ui.emit(second, "click");
        assert_eq!(*changes.borrow(), [1]);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut ui = Ui::new(MemoryDom::new());
        let (pane, _) = pane_with(&mut ui, &["One"]);
        pane.set_selected_index(&mut ui, 4);
        assert_eq!(pane.selected_index(), 0);
    }

    #[test]
    fn removing_the_last_selected_tab_clamps() {
        let mut ui = Ui::new(MemoryDom::new());
        let (pane, contents) = pane_with(&mut ui, &["One", "Two", "Three"]);
        pane.set_selected_index(&mut ui, 2);

        assert_eq!(pane.remove_tab(&mut ui, 2), Some(contents[2]));
        assert_eq!(pane.selected_index(), 1);
        assert_eq!(shown(&ui, &pane), Some(contents[1]));
        assert_eq!(pane.title(1).as_deref(), Some("Two"));
        assert!(ui.contains(contents[2]));

        assert_eq!(pane.remove_tab(&mut ui, 9), None);
        pane.remove_tab(&mut ui, 0);
        pane.remove_tab(&mut ui, 0);
        assert_eq!(pane.tab_count(), 0);
        assert_eq!(pane.selected_index(), 0);
        assert_eq!(shown(&ui, &pane), None);
    }

    #[test]
    fn hover_highlights_unselected_tabs() {
        let mut ui = Ui::new(MemoryDom::new());
        let (pane, _) = pane_with(&mut ui, &["One", "Two"]);
        let second = header_buttons(&ui, &pane)[1];

        ui.emit(second, "mouseover");
        assert_eq!(ui.style(second, "background-color"), Some("#f1f3f4"));
        ui.emit(second, "mouseout");
        assert_eq!(ui.style(second, "background-color"), Some("transparent"));
    }
}
