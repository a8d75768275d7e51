//! A table over JSON records with sorting, filtering and selection.

use std::{
    cell::RefCell,
    cmp::Ordering,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};
use trellis_core::{NodeId, State, Ui, UiError, Widget};

use crate::{component::table::SELECTED_ROW, sales::FetchError};

/// One record: column name to value.
pub type Row = serde_json::Map<String, Value>;

type SelectListener = Rc<dyn Fn(&mut Ui, usize)>;
type ClickListener = Rc<dyn Fn(&mut Ui, &Row)>;

/// How a column's values are ordered when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    /// Lexicographic order of the displayed text.
    #[default]
    Text,
    /// Numeric order. Strings are parsed; values that are not numbers fall
    /// back to text order.
    Number,
    /// ISO-8601 dates, compared as text.
    Date,
}

/// Text shown in a cell for `value`.
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
}

/// Orders two cells. Missing and `null` cells sort first.
fn compare(a: Option<&Value>, b: Option<&Value>, kind: ColumnType) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (kind, number(a), number(b)) {
            (ColumnType::Number, Some(x), Some(y)) => x.total_cmp(&y),
            _ => cell_text(a).cmp(&cell_text(b)),
        },
    }
}

struct Model {
    columns: Vec<String>,
    types: HashMap<String, ColumnType>,
    rows: Vec<Row>,
    filters: IndexMap<String, String>,
    sort: Option<(String, bool)>,
    view: State<Vec<Row>>,
    selectable: bool,
    selected: Option<usize>,
    body: Option<NodeId>,
    on_select: Option<SelectListener>,
    on_click: Option<ClickListener>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Model {
    fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|(column, needle)| {
            row.get(column)
                .filter(|value| !value.is_null())
                .is_some_and(|value| {
                    cell_text(value)
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
                })
        })
    }

    fn visible(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        if let Some((column, ascending)) = &self.sort {
            let kind = self.types.get(column).copied().unwrap_or_default();
            rows.sort_by(|a, b| {
                let order = compare(a.get(column), b.get(column), kind);
                if *ascending { order } else { order.reverse() }
            });
        }
        rows
    }
}

/// A table whose rows are JSON objects.
///
/// The rows on screen are the data with the active filters applied, in the
/// active sort order. They are published through [`DataTable::data_state`],
/// so other components (charts, summaries) can follow them. Row indices given
/// to [`remove_row`](Self::remove_row) and [`update_row`](Self::update_row)
/// refer to the unfiltered data; the selection refers to rows on screen.
#[derive(Debug, Clone)]
pub struct DataTable {
    id: NodeId,
    model: Rc<RefCell<Model>>,
}

impl Widget for DataTable {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl DataTable {
    /// Creates an empty table with the given columns.
    pub fn new<S: Into<String>>(ui: &mut Ui, columns: impl IntoIterator<Item = S>) -> Self {
        let id = ui
            .create_widget("div")
            .styles([
                ("width", "100%"),
                ("overflow", "auto"),
                ("border", "1px solid #e0e0e0"),
                ("border-radius", "4px"),
                ("background-color", "white"),
            ])
            .id();
        let view = State::new(Vec::new());
        let model = Rc::new(RefCell::new(Model {
            columns: columns.into_iter().map(Into::into).collect(),
            types: HashMap::new(),
            rows: Vec::new(),
            filters: IndexMap::new(),
            sort: None,
            view: view.clone(),
            selectable: true,
            selected: None,
            body: None,
            on_select: None,
            on_click: None,
        }));

        let weak: Weak<RefCell<Model>> = Rc::downgrade(&model);
        ui.watch(&view, move |ui, _| {
            if let Some(model) = weak.upgrade() {
                Self { id, model }.refresh(ui);
            }
        });

        let table = Self { id, model };
        table.refresh(ui);
        table
    }

    /// The rows currently on screen.
    #[must_use]
    pub fn data_state(&self) -> State<Vec<Row>> {
        self.model.borrow().view.clone()
    }

    /// Replaces the columns.
    pub fn set_columns<S: Into<String>>(
        &self,
        ui: &mut Ui,
        columns: impl IntoIterator<Item = S>,
    ) -> &Self {
        self.model.borrow_mut().columns = columns.into_iter().map(Into::into).collect();
        self.refresh(ui);
        self
    }

    /// Declares how a column sorts. Columns default to [`ColumnType::Text`].
    pub fn set_column_type(&self, column: &str, kind: ColumnType) -> &Self {
        self.model
            .borrow_mut()
            .types
            .insert(column.to_owned(), kind);
        self
    }

    /// Replaces the data.
    pub fn set_data(&self, ui: &mut Ui, rows: Vec<Row>) -> &Self {
        self.model.borrow_mut().rows = rows;
        self.publish(ui);
        self
    }

    /// Appends a record.
    pub fn add_row(&self, ui: &mut Ui, row: Row) -> &Self {
        self.model.borrow_mut().rows.push(row);
        self.publish(ui);
        self
    }

    /// Removes a record. Out-of-range indices are ignored.
    pub fn remove_row(&self, ui: &mut Ui, index: usize) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if index >= model.rows.len() {
                return self;
            }
            model.rows.remove(index);
        }
        self.publish(ui);
        self
    }

    /// Replaces a record. Out-of-range indices are ignored.
    pub fn update_row(&self, ui: &mut Ui, index: usize, row: Row) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            let Some(slot) = model.rows.get_mut(index) else {
                return self;
            };
            *slot = row;
        }
        self.publish(ui);
        self
    }

    /// Removes every record.
    pub fn clear_data(&self, ui: &mut Ui) -> &Self {
        self.set_data(ui, Vec::new())
    }

    /// Replaces the data with a JSON array of objects and returns how many
    /// records it held.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] and leaves the data unchanged if `json`
    /// is not an array of objects.
    pub fn load_json(&self, ui: &mut Ui, json: &str) -> Result<usize, FetchError> {
        let rows: Vec<Row> = serde_json::from_str(json)?;
        let count = rows.len();
        self.set_data(ui, rows);
        Ok(count)
    }

    /// The unfiltered data.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        self.model.borrow().rows.clone()
    }

    /// The rows on screen.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<Row> {
        self.model.borrow().view.get()
    }

    /// Sorts by `column`. The order is kept as the data changes.
    pub fn sort_by(&self, ui: &mut Ui, column: &str, ascending: bool) -> &Self {
        debug!(table = %self.id, column, ascending, "sorting");
        self.model.borrow_mut().sort = Some((column.to_owned(), ascending));
        self.publish(ui);
        self
    }

    /// The sorted column and whether it is ascending.
    #[must_use]
    pub fn sort_order(&self) -> Option<(String, bool)> {
        self.model.borrow().sort.clone()
    }

    /// Shows only rows whose `column` contains `needle`, ignoring case.
    ///
    /// A blank needle removes the column's filter.
    pub fn filter(&self, ui: &mut Ui, column: &str, needle: &str) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            if needle.trim().is_empty() {
                model.filters.shift_remove(column);
            } else {
                model.filters.insert(column.to_owned(), needle.to_owned());
            }
        }
        self.publish(ui);
        self
    }

    /// Removes every filter.
    pub fn clear_filters(&self, ui: &mut Ui) -> &Self {
        self.model.borrow_mut().filters.clear();
        self.publish(ui);
        self
    }

    /// The active filters in the order they were added.
    #[must_use]
    pub fn filters(&self) -> Vec<(String, String)> {
        self.model
            .borrow()
            .filters
            .iter()
            .map(|(column, needle)| (column.clone(), needle.clone()))
            .collect()
    }

    /// Turns row selection on or off.
    pub fn set_selectable(&self, ui: &mut Ui, selectable: bool) -> &Self {
        self.model.borrow_mut().selectable = selectable;
        self.refresh(ui);
        self
    }

    /// Index of the selected row on screen.
    #[must_use]
    pub fn selected_row(&self) -> Option<usize> {
        self.model.borrow().selected
    }

    /// The selected record.
    #[must_use]
    pub fn selected_row_data(&self) -> Option<Row> {
        let model = self.model.borrow();
        let index = model.selected?;
        model.view.with(|rows| rows.get(index).cloned())
    }

    /// Selects a row on screen, or clears the selection with `None`.
    ///
    /// Out-of-range rows are ignored. Listeners are not notified.
    pub fn set_selected_row(&self, ui: &mut Ui, row: Option<usize>) -> &Self {
        {
            let mut model = self.model.borrow_mut();
            let len = model.view.with(Vec::len);
            if row.is_some_and(|row| row >= len) {
                return self;
            }
            model.selected = row;
        }
        self.highlight(ui);
        self
    }

    /// Called with the row index when the user selects a row.
    pub fn on_row_select(&self, listener: impl Fn(&mut Ui, usize) + 'static) -> &Self {
        self.model.borrow_mut().on_select = Some(Rc::new(listener));
        self
    }

    /// Called with the record when the user selects a row.
    pub fn on_row_click(&self, listener: impl Fn(&mut Ui, &Row) + 'static) -> &Self {
        self.model.borrow_mut().on_click = Some(Rc::new(listener));
        self
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Recomputes the rows on screen. The table redraws through its own
    /// subscription, or directly when the rows did not change.
    fn publish(&self, ui: &mut Ui) {
        let (view, visible) = {
            let mut model = self.model.borrow_mut();
            let visible = model.visible();
            let len = visible.len();
            model.selected = model.selected.filter(|row| *row < len);
            (model.view.clone(), visible)
        };
        if !view.set(visible) {
            self.refresh(ui);
        }
        ui.flush();
    }

    fn select_from_click(&self, ui: &mut Ui, index: usize) {
        let (on_select, on_click, row) = {
            let mut model = self.model.borrow_mut();
            model.selected = Some(index);
            let row = model.view.with(|rows| rows.get(index).cloned());
            (model.on_select.clone(), model.on_click.clone(), row)
        };
        self.highlight(ui);
        if let Some(listener) = on_select {
            listener(ui, index);
        }
        if let (Some(listener), Some(row)) = (on_click, row) {
            listener(ui, &row);
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
            warn!(table = %self.id, %error, "could not rebuild data table");
        }
    }

    fn rebuild(&self, ui: &mut Ui) -> Result<(), UiError> {
        let model = self.model.borrow();
        let rows = model.view.get();
        ui.clear(self.id)?;

        let table = ui
            .create("table")
            .style("width", "100%")
            .style("border-collapse", "collapse")
            .font_size(14)
            .id();

        if !model.columns.is_empty() {
            let head = ui.create("thead").id();
            let header = ui.create("tr").id();
            for column in &model.columns {
                let cell = self.header_cell(ui, column, model.sort.as_ref());
                ui.add_child(header, cell)?;
            }
            ui.add_child(head, header)?;
            ui.add_child(table, head)?;

            if !model.filters.is_empty() {
                let filters = ui.create("tr").background("#f9f9f9").id();
                for column in &model.columns {
                    let cell = ui.create("td").padding("8px 10px").id();
                    if let Some(needle) = model.filters.get(column) {
                        let input = self.filter_input(ui, column, needle);
                        ui.add_child(cell, input)?;
                    }
                    ui.add_child(filters, cell)?;
                }
                ui.add_child(table, filters)?;
            }
        }

        let body = ui.create("tbody").id();
        for (index, record) in rows.iter().enumerate() {
            let row = self.body_row(ui, index, model.selectable, model.selected);
            for column in &model.columns {
                let text = record.get(column).map(cell_text).unwrap_or_default();
                let cell = ui
                    .create("td")
                    .text(text)
                    .padding("10px")
                    .style("border-bottom", "1px solid #ddd")
                    .id();
                ui.add_child(row, cell)?;
            }
            ui.add_child(body, row)?;
        }
        ui.add_child(table, body)?;
        ui.add_child(self.id, table)?;

        if rows.is_empty() {
            let empty = ui
                .create("div")
                .text("No data available")
                .padding("20px")
                .text_align("center")
                .foreground("#888")
                .id();
            ui.add_child(self.id, empty)?;
        }
        drop(model);

        self.model.borrow_mut().body = Some(body);
        Ok(())
    }

    fn header_cell(&self, ui: &mut Ui, column: &str, sort: Option<&(String, bool)>) -> NodeId {
        let text = match sort {
            Some((sorted, true)) if sorted == column => format!("{column} ▲"),
            Some((sorted, false)) if sorted == column => format!("{column} ▼"),
            _ => column.to_owned(),
        };
        let ascending = !matches!(sort, Some((sorted, true)) if sorted == column);

        let table = self.clone();
        let column = column.to_owned();
        ui.create("th")
            .text(text)
            .styles([
                ("padding", "12px 10px"),
                ("text-align", "left"),
                ("border-bottom", "2px solid #ddd"),
                ("font-weight", "600"),
                ("background-color", "#f5f5f5"),
                ("cursor", "pointer"),
            ])
            .on("click", move |ui, _| {
                table.sort_by(ui, &column, ascending);
            })
            .id()
    }

    fn filter_input(&self, ui: &mut Ui, column: &str, needle: &str) -> NodeId {
        let input = ui
            .create("input")
            .attr("type", "text")
            .attr("placeholder", "Filter...")
            .attr("value", needle)
            .styles([
                ("width", "100%"),
                ("padding", "4px"),
                ("border", "1px solid #ddd"),
                ("border-radius", "3px"),
            ])
            .id();
        let table = self.clone();
        let column = column.to_owned();
        let _ = ui.node(input).on("input", move |ui, _| {
            let value = ui
                .property(input, "value")
                .or_else(|| ui.attribute(input, "value").map(str::to_owned))
                .unwrap_or_default();
            table.filter(ui, &column, &value);
        });
        input
    }

    fn body_row(
        &self,
        ui: &mut Ui,
        index: usize,
        selectable: bool,
        selected: Option<usize>,
    ) -> NodeId {
        let row = ui.create("tr").id();
        if selectable {
            let table = self.clone();
            let _ = ui
                .node(row)
                .style("cursor", "pointer")
                .on("click", move |ui, _| table.select_from_click(ui, index));
            if selected == Some(index) {
                let _ = ui.node(row).background(SELECTED_ROW);
            }
        }

        let over = self.clone();
        let out = self.clone();
        let _ = ui
            .node(row)
            .on("mouseover", move |ui, _| {
                if over.selected_row() != Some(index) {
                    let _ = ui.node(row).background("#f5f5f5");
                }
            })
            .on("mouseout", move |ui, _| {
                if out.selected_row() != Some(index) {
                    let _ = ui.remove_style(row, "background-color");
                }
            });
        row
    }
}
