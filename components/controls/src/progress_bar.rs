//! Determinate and indeterminate progress indicators.

use trellis_core::{NodeId, Ui, Widget};

const KEYFRAMES: &str = "@keyframes progress-bar-indeterminate {\n  0% { left: -30%; }\n  100% { left: 100%; }\n}";

/// A horizontal track with a coloured fill.
///
/// The value is always kept within `minimum..=maximum`. The fill is rebuilt
/// whenever the value, range, mode or colour changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    id: NodeId,
    minimum: i32,
    maximum: i32,
    value: i32,
    indeterminate: bool,
    foreground: String,
}

impl Widget for ProgressBar {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl ProgressBar {
    /// Creates a bar for `0..=100` at zero.
    pub fn new(ui: &mut Ui) -> Self {
        Self::with_range(ui, 0, 100, 0)
    }

    /// Creates a bar for `minimum..=maximum` at `value`.
    pub fn with_range(ui: &mut Ui, minimum: i32, maximum: i32, value: i32) -> Self {
        let id = ui
            .create_widget("div")
            .styles([
                ("width", "100%"),
                ("height", "8px"),
                ("background-color", "#e0e0e0"),
                ("border-radius", "4px"),
                ("overflow", "hidden"),
                ("position", "relative"),
            ])
            .id();
        let mut bar = Self {
            id,
            minimum,
            maximum,
            value,
            indeterminate: false,
            foreground: String::from(crate::ACCENT),
        };
        bar.value = bar.clamp(value);
        bar.update(ui);
        bar
    }

    const fn clamp(&self, value: i32) -> i32 {
        let value = if value > self.maximum { self.maximum } else { value };
        if value < self.minimum { self.minimum } else { value }
    }

    /// The current value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Moves the bar, clamping into range.
    pub fn set_value(&mut self, ui: &mut Ui, value: i32) -> &mut Self {
        self.value = self.clamp(value);
        self.update(ui);
        self
    }

    /// The lower bound.
    #[must_use]
    pub const fn minimum(&self) -> i32 {
        self.minimum
    }

    /// Changes the lower bound, raising the value if needed.
    pub fn set_minimum(&mut self, ui: &mut Ui, minimum: i32) -> &mut Self {
        self.minimum = minimum;
        self.value = self.value.max(minimum);
        self.update(ui);
        self
    }

    /// The upper bound.
    #[must_use]
    pub const fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Changes the upper bound, lowering the value if needed.
    pub fn set_maximum(&mut self, ui: &mut Ui, maximum: i32) -> &mut Self {
        self.maximum = maximum;
        self.value = self.value.min(maximum);
        self.update(ui);
        self
    }

    /// Returns whether the bar shows activity instead of a value.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    /// Switches between a value fill and a sliding activity indicator.
    pub fn set_indeterminate(&mut self, ui: &mut Ui, indeterminate: bool) -> &mut Self {
        self.indeterminate = indeterminate;
        self.update(ui);
        self
    }

    /// Sets the fill colour.
    pub fn set_foreground(&mut self, ui: &mut Ui, color: &str) -> &mut Self {
        color.clone_into(&mut self.foreground);
        self.update(ui);
        self
    }

    /// Filled share of the track, `0.0..=100.0`.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.maximum <= self.minimum {
            return 0.0;
        }
        f64::from(self.value - self.minimum) / f64::from(self.maximum - self.minimum) * 100.0
    }

    fn update(&self, ui: &mut Ui) {
        let _ = ui.clear(self.id);
        let fill = if self.indeterminate {
            let keyframes = ui.create("style").text(KEYFRAMES).id();
            let _ = ui.add_child(self.id, keyframes);
            ui.create_widget("div")
                .styles([
                    ("position", "absolute"),
                    ("top", "0"),
                    ("left", "0"),
                    ("height", "100%"),
                    ("width", "30%"),
                ])
                .background(&self.foreground)
                .style("border-radius", "4px")
                .style("animation", "progress-bar-indeterminate 2s infinite linear")
                .id()
        } else {
            ui.create_widget("div")
                .style("width", format!("{}%", self.percent()))
                .style("height", "100%")
                .background(&self.foreground)
                .style("border-radius", "4px")
                .style("transition", "width 0.3s ease")
                .id()
        };
        let _ = ui.add_child(self.id, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::MemoryDom;

    fn fill(ui: &Ui, bar: &ProgressBar) -> NodeId {
        *ui.children(bar.id()).last().unwrap()
    }

    #[test]
    fn value_is_clamped_into_range() {
        let mut ui = Ui::new(MemoryDom::new());
        let mut bar = ProgressBar::with_range(&mut ui, 10, 20, 99);
        assert_eq!(bar.value(), 20);

        bar.set_value(&mut ui, -5);
        assert_eq!(bar.value(), 10);
        bar.set_value(&mut ui, 15);
        assert_eq!(ui.style(fill(&ui, &bar), "width"), Some("50%"));

        bar.set_maximum(&mut ui, 12);
        assert_eq!(bar.value(), 12);
        bar.set_minimum(&mut ui, 13);
        assert_eq!(bar.value(), 13);
        assert!(bar.percent().abs() < f64::EPSILON);
    }

    #[test]
    fn indeterminate_mode_adds_keyframes() {
        let mut ui = Ui::new(MemoryDom::new());
        let mut bar = ProgressBar::new(&mut ui);
        bar.set_foreground(&mut ui, "#34a853").set_indeterminate(&mut ui, true);

        let children = ui.children(bar.id()).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(ui.tag(children[0]), Some("style"));
        assert!(ui.text(children[0]).unwrap().contains("@keyframes"));
        assert_eq!(ui.style(children[1], "width"), Some("30%"));
        assert_eq!(ui.style(children[1], "background-color"), Some("#34a853"));

        bar.set_indeterminate(&mut ui, false);
        assert_eq!(ui.children(bar.id()).len(), 1);
        assert_eq!(ui.style(fill(&ui, &bar), "width"), Some("0%"));
    }
}
