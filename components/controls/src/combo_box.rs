//! Drop-down selection.

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::trace;
use trellis_core::{NodeId, Ui, Widget};

type SelectionListener = Rc<dyn Fn(&mut Ui, Option<usize>)>;

#[derive(Default)]
struct Model {
    items: Vec<String>,
    selected: Option<usize>,
    listener: Option<SelectionListener>,
    editable: bool,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("items", &self.items)
            .field("selected", &self.selected)
            .field("editable", &self.editable)
            .finish_non_exhaustive()
    }
}

/// A `<select>` whose options mirror a list of strings.
///
/// The selected index is `None` when nothing is selected. Removing items keeps
/// the selection inside the list.
#[derive(Debug, Clone)]
pub struct ComboBox {
    id: NodeId,
    model: Rc<RefCell<Model>>,
}

impl Widget for ComboBox {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl ComboBox {
    /// Creates an empty combo box.
    pub fn new(ui: &mut Ui) -> Self {
        let id = ui
            .create_widget("select")
            .styles([
                ("padding", "8px 12px"),
                ("border", "1px solid #dadce0"),
                ("border-radius", "4px"),
                ("font-size", "14px"),
                ("width", "100%"),
                ("background-color", "white"),
                ("cursor", "pointer"),
                ("transition", "border-color 0.2s"),
            ])
            .id();
        crate::focus_feedback(ui, id);

        let model = Rc::new(RefCell::new(Model::default()));
        let shared = Rc::clone(&model);
        let _ = ui.node(id).on("change", move |ui, _| {
            if !ui.is_enabled(id) {
                return;
            }
            let Some(index) = ui
                .property(id, "selectedIndex")
                .and_then(|raw| raw.parse::<i64>().ok())
            else {
                return;
            };
            let index = usize::try_from(index).ok();
            let listener = {
                let mut model = shared.borrow_mut();
                if model.selected == index {
                    return;
                }
                model.selected = index;
                model.listener.clone()
            };
            trace!(combo = %id, ?index, "selection changed");
            if let Some(listener) = listener {
                listener(ui, index);
            }
        });

        Self { id, model }
    }

    /// Creates a combo box holding `items`.
    pub fn with_items<S: Into<String>>(ui: &mut Ui, items: impl IntoIterator<Item = S>) -> Self {
        let combo = Self::new(ui);
        combo.set_items(ui, items);
        combo
    }

    /// Replaces every item. The selection is kept if it is still in range.
    pub fn set_items<S: Into<String>>(&self, ui: &mut Ui, items: impl IntoIterator<Item = S>) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            model.items = items.into_iter().map(Into::into).collect();
            let len = model.items.len();
            model.selected = model.selected.filter(|index| *index < len);
        }
        self.refresh(ui);
        self
    }

    /// A copy of the items.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.model.borrow().items.clone()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.model.borrow().items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.borrow().items.is_empty()
    }

    /// Appends an item.
    pub fn add_item(&self, ui: &mut Ui, item: impl Into<String>) -> &Self {
        self.model.borrow_mut().items.push(item.into());
        self.refresh(ui);
        self
    }

    /// Removes the item at `index`; out-of-range indices are ignored.
    ///
    /// A selection past the new end moves to the last item.
    pub fn remove_item(&self, ui: &mut Ui, index: usize) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if index >= model.items.len() {
                return self;
            }
            model.items.remove(index);
            let len = model.items.len();
            if model.selected.is_some_and(|selected| selected >= len) {
                model.selected = len.checked_sub(1);
            }
        }
        self.refresh(ui);
        self
    }

    /// Removes the first item equal to `item`.
    pub fn remove_item_named(&self, ui: &mut Ui, item: &str) -> &Self {
        let index = self.position(item);
        if let Some(index) = index {
            self.remove_item(ui, index);
        }
        self
    }

    /// Removes every item and clears the selection.
    pub fn clear_items(&self, ui: &mut Ui) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            model.items.clear();
            model.selected = None;
        }
        self.refresh(ui);
        self
    }

    /// Index of the selected item.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.model.borrow().selected
    }

    /// Selects the item at `index`, or clears the selection with `None`.
    ///
    /// Out-of-range indices are ignored. The selection listener is not called.
    pub fn set_selected_index(&self, ui: &mut Ui, index: Option<usize>) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if index.is_some_and(|index| index >= model.items.len()) || index == model.selected {
                return self;
            }
            model.selected = index;
        }
        self.sync_selected(ui);
        self
    }

    /// The selected item.
    #[must_use]
    pub fn selected_item(&self) -> Option<String> {
        let model = self.model.borrow();
        model.selected.and_then(|index| model.items.get(index).cloned())
    }

    /// Selects the first item equal to `item`; unknown items are ignored.
    pub fn set_selected_item(&self, ui: &mut Ui, item: &str) -> &Self {
        if let Some(index) = self.position(item) {
            self.set_selected_index(ui, Some(index));
        }
        self
    }

    /// Called with the new index whenever the user picks another item.
    pub fn on_selection_change(&self, listener: impl Fn(&mut Ui, Option<usize>) + 'static) -> &Self {
        self.model.borrow_mut().listener = Some(Rc::new(listener));
        self
    }

    /// Records whether the box should accept free text. A `<select>` cannot,
    /// so this is bookkeeping only.
    pub fn set_editable(&self, editable: bool) -> &Self {
        self.model.borrow_mut().editable = editable;
        self
    }

    /// Returns the editable flag.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.model.borrow().editable
    }

    fn position(&self, item: &str) -> Option<usize> {
        self.model.borrow().items.iter().position(|candidate| candidate == item)
    }

    /// Rebuilds the option children from the model.
    fn refresh(&self, ui: &mut Ui) {
        let _ = ui.clear(self.id);
        let items = self.items();
        for (index, item) in items.iter().enumerate() {
            let option = ui
                .create("option")
                .text(item.as_str())
                .attr("value", format!("{index}"))
                .id();
            let _ = ui.add_child(self.id, option);
        }
        self.sync_selected(ui);
    }

    fn sync_selected(&self, ui: &mut Ui) {
        let selected = self.selected_index();
        for (index, option) in ui.children(self.id).to_vec().into_iter().enumerate() {
            let node = ui.node(option);
            let _ = if selected == Some(index) {
                node.attr("selected", "selected")
            } else {
                node.remove_attr("selected")
            };
        }
        if ui.is_mounted(self.id) {
            let index = selected.map_or_else(|| String::from("-1"), |index| format!("{index}"));
            let _ = ui.set_property(self.id, "selectedIndex", &index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use trellis_core::MemoryDom;

    fn abc(ui: &mut Ui) -> ComboBox {
        ComboBox::with_items(ui, ["A", "B", "C"])
    }

    #[test]
    fn selection_by_index_and_removal_clamping() {
        let mut ui = Ui::new(MemoryDom::new());
        let combo = abc(&mut ui);

        combo.set_selected_index(&mut ui, Some(1));
        assert_eq!(combo.selected_item().as_deref(), Some("B"));

        combo.remove_item(&mut ui, 1);
        assert_eq!(combo.items(), ["A", "C"]);
        assert_eq!(combo.selected_index(), Some(1));
        assert_eq!(combo.selected_item().as_deref(), Some("C"));

        combo.remove_item(&mut ui, 1);
        assert_eq!(combo.selected_index(), Some(0));
        combo.remove_item(&mut ui, 0);
        assert_eq!(combo.selected_index(), None);
        assert!(combo.is_empty());
    }

    #[test]
    fn out_of_range_requests_are_ignored() {
        let mut ui = Ui::new(MemoryDom::new());
        let combo = abc(&mut ui);
        combo.set_selected_index(&mut ui, Some(3));
        assert_eq!(combo.selected_index(), None);
        combo.remove_item(&mut ui, 7);
        assert_eq!(combo.len(), 3);
        combo.set_selected_item(&mut ui, "Z");
        assert_eq!(combo.selected_index(), None);

        combo.set_selected_item(&mut ui, "C");
        assert_eq!(combo.selected_index(), Some(2));
        combo.remove_item_named(&mut ui, "A");
        assert_eq!(combo.selected_item().as_deref(), Some("C"));
        assert_eq!(combo.selected_index(), Some(1));
    }

    #[test]
    fn options_mirror_items() {
        let mut ui = Ui::new(MemoryDom::new());
        let combo = abc(&mut ui);
        combo.set_selected_index(&mut ui, Some(2));
        let body = ui.body();
        let element = ui.render(combo.id(), body).unwrap();
        combo.add_item(&mut ui, "D");

        let options = ui.dom().children(element);
        assert_eq!(options.len(), 4);
        assert_eq!(ui.dom().text(options[3]).as_deref(), Some("D"));
        assert_eq!(ui.dom().attribute(options[3], "value").as_deref(), Some("3"));
        assert_eq!(ui.dom().attribute(options[2], "selected").as_deref(), Some("selected"));
        assert_eq!(ui.property(combo.id(), "selectedIndex").as_deref(), Some("2"));

        combo.clear_items(&mut ui);
        assert!(ui.dom().children(element).is_empty());
    }

    #[test]
    fn change_events_sync_from_the_platform() {
        let mut ui = Ui::new(MemoryDom::new());
        let combo = abc(&mut ui);
        let body = ui.body();
        ui.render(combo.id(), body).unwrap();

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(Cell::new(None));
        let (counter, sink) = (Rc::clone(&calls), Rc::clone(&seen));
        combo.on_selection_change(move |_, index| {
            counter.set(counter.get() + 1);
            sink.set(index);
        });

        ui.set_property(combo.id(), "selectedIndex", "2").unwrap();
        ui.emit(combo.id(), "change");
        ui.emit(combo.id(), "change");

        assert_eq!(combo.selected_item().as_deref(), Some("C"));
        assert_eq!(seen.get(), Some(2));
        assert_eq!(calls.get(), 1);
    }
}
