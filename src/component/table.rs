//! A table of strings.

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::warn;
use trellis_core::{NodeId, Ui, UiError, Widget};

/// Background of the selected row.
pub(crate) const SELECTED_ROW: &str = "#e8f0fe";

type RowListener = Rc<dyn Fn(&mut Ui, usize)>;

struct Model {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    selectable: bool,
    selected: Option<usize>,
    body: Option<NodeId>,
    listener: Option<RowListener>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("selectable", &self.selectable)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

/// A `<table>` with a header row and rows of text cells.
///
/// Every change rebuilds the table body. Clicking a row selects it when the
/// table is selectable, which it is by default.
#[derive(Debug, Clone)]
pub struct Table {
    id: NodeId,
    model: Rc<RefCell<Model>>,
}

impl Widget for Table {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Table {
    /// Creates a table with the given column names and no rows.
    pub fn new<S: Into<String>>(ui: &mut Ui, columns: impl IntoIterator<Item = S>) -> Self {
        let id = ui
            .create_widget("table")
            .style("width", "100%")
            .style("border-collapse", "collapse")
            .font_size(14)
            .id();
        let table = Self {
            id,
            model: Rc::new(RefCell::new(Model {
                columns: columns.into_iter().map(Into::into).collect(),
                rows: Vec::new(),
                selectable: true,
                selected: None,
                body: None,
                listener: None,
            })),
        };
        table.refresh(ui);
        table
    }

    /// Replaces the column names.
    pub fn set_columns<S: Into<String>>(
        &self,
        ui: &mut Ui,
        columns: impl IntoIterator<Item = S>,
    ) -> &Self {
        self.model.borrow_mut().columns = columns.into_iter().map(Into::into).collect();
        self.refresh(ui);
        self
    }

    /// Replaces every row.
    pub fn set_rows(&self, ui: &mut Ui, rows: Vec<Vec<String>>) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            model.rows = rows;
            let len = model.rows.len();
            model.selected = model.selected.filter(|row| *row < len);
        }
        self.refresh(ui);
        self
    }

    /// Appends a row.
    pub fn add_row<S: Into<String>>(&self, ui: &mut Ui, row: impl IntoIterator<Item = S>) -> &Self {
        self.model
            .borrow_mut()
            .rows
            .push(row.into_iter().map(Into::into).collect());
        self.refresh(ui);
        self
    }

    /// Removes a row. Out-of-range indices are ignored.
    pub fn remove_row(&self, ui: &mut Ui, index: usize) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if index >= model.rows.len() {
                return self;
            }
            model.rows.remove(index);
            model.selected = match model.selected {
                Some(selected) if selected == index => None,
                Some(selected) if selected > index => Some(selected - 1),
                other => other,
            };
        }
        self.refresh(ui);
        self
    }

    /// Removes every row.
    pub fn clear_rows(&self, ui: &mut Ui) -> &Self {
        self.set_rows(ui, Vec::new())
    }

    /// A copy of the rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.model.borrow().rows.clone()
    }

    /// Turns row selection on or off.
    pub fn set_selectable(&self, ui: &mut Ui, selectable: bool) -> &Self {
        self.model.borrow_mut().selectable = selectable;
        self.refresh(ui);
        self
    }

    /// The selected row.
    #[must_use]
    pub fn selected_row(&self) -> Option<usize> {
        self.model.borrow().selected
    }

    /// Selects a row, or clears the selection with `None`.
    ///
    /// Out-of-range rows are ignored. The listener is not notified.
    pub fn set_selected_row(&self, ui: &mut Ui, row: Option<usize>) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if row.is_some_and(|row| row >= model.rows.len()) {
                return self;
            }
            model.selected = row;
        }
        self.highlight(ui);
        self
    }

    /// Called with the row index when the user selects a row.
    pub fn on_row_select(&self, listener: impl Fn(&mut Ui, usize) + 'static) -> &Self {
        self.model.borrow_mut().listener = Some(Rc::new(listener));
        self
    }

    fn select_from_click(&self, ui: &mut Ui, row: usize) {
        let listener = {
            let mut model = self.model.borrow_mut();
            model.selected = Some(row);
            model.listener.clone()
        };
        self.highlight(ui);
        if let Some(listener) = listener {
            listener(ui, row);
        }
    }

    fn highlight(&self, ui: &mut Ui) {
        let (body, selected) = {
            let model = self.model.borrow();
            (model.body, model.selected)
        };
        let Some(body) = body else {
            return;
        };
        let rows = ui.children(body).to_vec();
        for (index, row) in rows.into_iter().enumerate() {
            if Some(index) == selected {
                let _ = ui.node(row).background(SELECTED_ROW);
            } else {
                let _ = ui.remove_style(row, "background-color");
            }
        }
    }

    fn refresh(&self, ui: &mut Ui) {
        if let Err(error) = self.rebuild(ui) {
            warn!(table = %self.id, %error, "could not rebuild table");
        }
    }

    fn rebuild(&self, ui: &mut Ui) -> Result<(), UiError> {
        let model = self.model.borrow();
        ui.clear(self.id)?;

        if !model.columns.is_empty() {
            let head = ui.create("thead").id();
            let header = ui.create("tr").id();
            for column in &model.columns {
                let cell = ui
                    .create("th")
                    .text(column.as_str())
                    .padding("10px")
                    .text_align("left")
                    .style("border-bottom", "2px solid #ddd")
                    .font_weight("bold")
                    .id();
                ui.add_child(header, cell)?;
            }
            ui.add_child(head, header)?;
            ui.add_child(self.id, head)?;
        }

        let body = ui.create("tbody").id();
        for (index, cells) in model.rows.iter().enumerate() {
            let row = ui.create("tr").id();
            if model.selectable {
                let table = self.clone();
                let _ = ui
                    .node(row)
                    .style("cursor", "pointer")
                    .on("click", move |ui, _| table.select_from_click(ui, index));
                if model.selected == Some(index) {
                    let _ = ui.node(row).background(SELECTED_ROW);
                }
            }
            for value in cells {
                let cell = ui
                    .create("td")
                    .text(value.as_str())
                    .padding("8px 10px")
                    .style("border-bottom", "1px solid #ddd")
                    .id();
                ui.add_child(row, cell)?;
            }
            ui.add_child(body, row)?;
        }
        ui.add_child(self.id, body)?;
        drop(model);

        self.model.borrow_mut().body = Some(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use trellis_core::{MemoryDom, NodeId, Ui};

    use super::{SELECTED_ROW, Table};

    fn table(ui: &mut Ui) -> Table {
        let table = Table::new(ui, ["Name", "Qty"]);
        table.add_row(ui, ["Laptop", "3"]).add_row(ui, ["Mouse", "9"]);
        table
    }

    fn body_rows(ui: &Ui, table: &Table) -> Vec<NodeId> {
        let body = *ui.children(table.id).last().unwrap();
        ui.children(body).to_vec()
    }

    #[test]
    fn renders_header_and_rows() {
        let mut ui = Ui::new(MemoryDom::new());
        let table = table(&mut ui);
        let body = ui.body();
        let element = ui.render(table.id, body).unwrap();

        let html = ui.dom().outer_html(element).unwrap();
        assert!(html.starts_with("<table"));
        assert!(html.contains(">Name</th>"));
        assert!(html.contains(">Mouse</td>"));
        assert_eq!(body_rows(&ui, &table).len(), 2);
    }

    #[test]
    fn headerless_tables_only_have_a_body() {
        let mut ui = Ui::new(MemoryDom::new());
        let table = Table::new(&mut ui, Vec::<String>::new());
        assert_eq!(ui.children(table.id).len(), 1);
        assert_eq!(ui.tag(ui.children(table.id)[0]), Some("tbody"));
    }

    #[test]
    fn clicking_selects_and_notifies() {
        let mut ui = Ui::new(MemoryDom::new());
        let table = table(&mut ui);
        let picked = Rc::new(Cell::new(None));
        let sink = Rc::clone(&picked);
        table.on_row_select(move |_, row| sink.set(Some(row)));

        let rows = body_rows(&ui, &table);
        let cell = ui.children(rows[1])[0];
        ui.emit(cell, "click");

        assert_eq!(picked.get(), Some(1));
        assert_eq!(table.selected_row(), Some(1));
        assert_eq!(ui.style(rows[1], "background-color"), Some(SELECTED_ROW));
        assert_eq!(ui.style(rows[0], "background-color"), None);
    }

    #[test]
    fn unselectable_rows_ignore_clicks() {
        let mut ui = Ui::new(MemoryDom::new());
        let table = table(&mut ui);
        table.set_selectable(&mut ui, false);

        let rows = body_rows(&ui, &table);
        ui.emit(rows[0], "click");
        assert_eq!(table.selected_row(), None);
    }

    #[test]
    fn removing_rows_keeps_selection_on_the_same_row() {
        let mut ui = Ui::new(MemoryDom::new());
        let table = table(&mut ui);
        table.add_row(&mut ui, ["Monitor", "1"]);
        table.set_selected_row(&mut ui, Some(2));

        table.remove_row(&mut ui, 0);
        assert_eq!(table.selected_row(), Some(1));
        assert_eq!(table.rows()[1][0], "Monitor");

        table.remove_row(&mut ui, 1);
        assert_eq!(table.selected_row(), None);
        table.set_selected_row(&mut ui, Some(5));
        assert_eq!(table.selected_row(), None);
    }
}
