//! Component tree behaviour tests.
//!
//! Everything runs against [`MemoryDom`], so what a test asserts about the DOM
//! is exactly what the tree asked the platform to do.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use proptest::prelude::*;

use crate::{Event, MOUNT, MemoryDom, NodeId, State, Ui, UiError};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn ui() -> Ui {
    Ui::new(MemoryDom::new())
}

fn html(ui: &Ui, id: NodeId) -> String {
    let handle = ui.handle(id).expect("node is mounted");
    ui.dom().outer_html(handle).expect("element exists")
}

fn rendered_texts(ui: &Ui, parent: NodeId) -> Vec<String> {
    let handle = ui.handle(parent).expect("parent is mounted");
    ui.dom()
        .children(handle)
        .into_iter()
        .map(|child| ui.dom().text(child).unwrap_or_default())
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn deferred_mutations_are_applied_on_render() {
    let mut ui = ui();
    let id = ui
        .create("a")
        .text("Docs")
        .attr("href", "/docs")
        .style("color", "red")
        .style("margin", "0")
        .id();
    assert!(!ui.is_mounted(id));

    let body = ui.body();
    ui.render(id, body).unwrap();

    assert_eq!(
        html(&ui, id),
        r#"<a href="/docs" style="color: red; margin: 0">Docs</a>"#
    );
    assert_eq!(ui.dom().parent(ui.handle(id).unwrap()), Some(body));
}

#[test]
fn mutations_after_render_apply_immediately() {
    let mut ui = ui();
    let id = ui.create("p").text("before").id();
    let body = ui.body();
    let element = ui.render(id, body).unwrap();

    ui.set_text(id, "after").unwrap();
    ui.set_style(id, "color", "blue").unwrap();
    ui.set_attribute(id, "title", "tip").unwrap();
    ui.remove_attribute(id, "title").unwrap();

    assert_eq!(ui.dom().text(element).as_deref(), Some("after"));
    assert_eq!(ui.dom().style(element, "color").as_deref(), Some("blue"));
    assert_eq!(ui.dom().attribute(element, "title"), None);
}

#[test]
fn second_render_is_rejected() {
    let mut ui = ui();
    let id = ui.create("div").id();
    let body = ui.body();
    ui.render(id, body).unwrap();

    assert_eq!(ui.render(id, body), Err(UiError::AlreadyRendered(id)));
    assert_eq!(ui.dom().children(body).len(), 1);
}

#[test]
fn child_added_after_mount_is_rendered_immediately() {
    let mut ui = ui();
    let list = ui.create("ul").id();
    let body = ui.body();
    ui.render(list, body).unwrap();

    let item = ui.create("li").text("late").id();
    ui.add_child(list, item).unwrap();

    assert!(ui.is_mounted(item));
    assert_eq!(html(&ui, list), "<ul><li>late</li></ul>");
}

#[test]
fn adding_existing_child_moves_it() {
    let mut ui = ui();
    let left = ui.create("div").id();
    let right = ui.create("div").id();
    let item = ui.create("span").text("x").id();
    let body = ui.body();
    ui.render(left, body).unwrap();
    ui.render(right, body).unwrap();

    ui.add_child(left, item).unwrap();
    ui.add_child(right, item).unwrap();

    assert!(ui.children(left).is_empty());
    assert_eq!(ui.children(right), &[item]);
    assert_eq!(ui.parent(item), Some(right));
    assert_eq!(html(&ui, left), "<div></div>");
    assert_eq!(html(&ui, right), "<div><span>x</span></div>");
}

#[test]
fn cycles_are_rejected() {
    let mut ui = ui();
    let outer = ui.create("div").id();
    let inner = ui.create("div").id();
    ui.add_child(outer, inner).unwrap();

    assert_eq!(
        ui.add_child(inner, outer),
        Err(UiError::Cycle {
            parent: inner,
            child: outer
        })
    );
    assert_eq!(
        ui.add_child(outer, outer),
        Err(UiError::Cycle {
            parent: outer,
            child: outer
        })
    );
}

#[test]
fn clear_and_destroy_free_nodes() {
    let mut ui = ui();
    let root = ui.create("div").id();
    let a = ui.create("span").id();
    let b = ui.create("span").id();
    let grandchild = ui.create("em").id();
    ui.add_child(a, grandchild).unwrap();
    ui.node(root).child(a).unwrap().child(b).unwrap();
    let body = ui.body();
    ui.render(root, body).unwrap();

    ui.clear(root).unwrap();
    assert!(ui.children(root).is_empty());
    assert!(!ui.contains(a));
    assert!(!ui.contains(grandchild));
    assert_eq!(html(&ui, root), "<div></div>");

    ui.destroy(root).unwrap();
    assert!(!ui.contains(root));
    assert!(ui.dom().children(body).is_empty());
    assert_eq!(ui.node_count(), 0);
    assert_eq!(ui.set_text(root, "gone"), Err(UiError::UnknownNode(root)));
}

#[test]
fn destroyed_elements_are_released() {
    let mut ui = ui();
    let root = ui.create("div").id();
    let child = ui.create("span").on("click", |_, _| {}).id();
    ui.add_child(root, child).unwrap();
    let body = ui.body();
    let root_element = ui.render(root, body).unwrap();
    let child_element = ui.handle(child).unwrap();

    ui.destroy(root).unwrap();
    assert_eq!(ui.dom().tag_name(root_element), None);
    assert_eq!(ui.dom().tag_name(child_element), None);

    // Fresh nodes take over the freed elements.
    let mut reused = Vec::new();
    for _ in 0..2 {
        let id = ui.create("p").id();
        reused.push(ui.render(id, body).unwrap());
    }
    reused.sort();
    let mut freed = vec![root_element, child_element];
    freed.sort();
    assert_eq!(reused, freed);
    assert_eq!(ui.node_for_handle(child_element).map(|id| ui.tag(id)), Some(Some("p")));
}

#[test]
fn rebuilding_a_subtree_does_not_grow_the_dom() {
    let mut ui = ui();
    let list = ui.create("ul").id();
    let body = ui.body();
    ui.render(list, body).unwrap();

    let mut highest = Vec::new();
    for round in 0..20 {
        ui.clear(list).unwrap();
        for i in 0..5 {
            let item = ui.create("li").text(format!("{round}-{i}")).id();
            ui.add_child(list, item).unwrap();
        }
        let top = ui
            .children(list)
            .iter()
            .filter_map(|item| ui.handle(*item))
            .max()
            .unwrap();
        highest.push(top);
    }
    assert!(highest.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(rendered_texts(&ui, list).len(), 5);
}

#[test]
fn moving_a_mounted_child_under_an_unmounted_parent_detaches_it() {
    let mut ui = ui();
    let old = ui.create("div").id();
    let child = ui.create("span").text("c").id();
    ui.add_child(old, child).unwrap();
    let body = ui.body();
    ui.render(old, body).unwrap();

    let section = ui.create("section").id();
    ui.add_child(section, child).unwrap();

    assert!(ui.children(old).is_empty());
    assert_eq!(ui.parent(child), Some(section));
    assert_eq!(html(&ui, old), "<div></div>");
    assert!(ui.is_mounted(child));

    ui.render(section, body).unwrap();
    assert_eq!(html(&ui, section), "<section><span>c</span></section>");
}

#[test]
fn remove_from_parent_keeps_node_alive() {
    let mut ui = ui();
    let root = ui.create("div").id();
    let child = ui.create("span").id();
    ui.add_child(root, child).unwrap();
    let body = ui.body();
    ui.render(root, body).unwrap();

    ui.remove_from_parent(child).unwrap();

    assert!(ui.contains(child));
    assert!(ui.is_mounted(child));
    assert_eq!(ui.parent(child), None);
    assert_eq!(html(&ui, root), "<div></div>");
}

#[test]
fn mount_listeners_fire_once_attached() {
    let mut ui = ui();
    let body = ui.body();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let child = ui
        .create("span")
        .on(MOUNT, move |ui, event| {
            let target = event.target().unwrap();
            let handle = ui.handle(target).unwrap();
            // The whole subtree is attached before any mount listener runs.
            sink.borrow_mut()
                .push(ui.dom().parent(ui.dom().parent(handle).unwrap()));
        })
        .id();
    let root = ui.create("div").child(child).unwrap().id();

    ui.render(root, body).unwrap();
    assert_eq!(*seen.borrow(), vec![Some(body)]);
}

#[test]
fn listeners_accumulate_per_type() {
    let mut ui = ui();
    let id = ui
        .create("button")
        .on("click", |_, _| {})
        .on("click", |_, _| {})
        .id();
    let body = ui.body();
    let element = ui.render(id, body).unwrap();
    ui.add_event_listener(id, "focus", |_, _| {}).unwrap();

    let memory = ui.dom();
    assert_eq!(memory.tag_name(element).as_deref(), Some("button"));
    assert_eq!(ui.listener_count(id, "click"), 2);
    assert_eq!(ui.listener_count(id, "focus"), 1);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn events_bubble_until_stopped() {
    let mut ui = ui();
    let log = Rc::new(RefCell::new(Vec::new()));

    let record = |name: &'static str, stop: bool| {
        let log = Rc::clone(&log);
        move |_: &mut Ui, event: &mut Event| {
            log.borrow_mut().push(name);
            if stop {
                event.stop_propagation();
            }
        }
    };

    let leaf = ui.create("button").on("click", record("leaf", false)).id();
    let middle = ui
        .create("div")
        .on("click", record("middle-1", true))
        .on("click", record("middle-2", false))
        .child(leaf)
        .unwrap()
        .id();
    ui.create("section")
        .on("click", record("root", false))
        .child(middle)
        .unwrap();

    let event = ui.emit(leaf, "click");
    assert_eq!(*log.borrow(), vec!["leaf", "middle-1", "middle-2"]);
    assert_eq!(event.target(), Some(leaf));
    assert_eq!(event.current_target(), Some(middle));
}

#[test]
fn non_bubbling_events_stay_on_target() {
    let mut ui = ui();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let child = ui.create("span").id();
    ui.create("div")
        .on("focus", move |_, _| counter.set(counter.get() + 1))
        .child(child)
        .unwrap();

    ui.dispatch(child, Event::non_bubbling("focus"));
    assert_eq!(hits.get(), 0);
}

#[test]
fn prevent_default_is_reported() {
    let mut ui = ui();
    let link = ui.create("a").id();
    ui.create("nav")
        .on("click", |_, event| event.prevent_default())
        .child(link)
        .unwrap();

    assert!(ui.emit(link, "click").is_default_prevented());
    assert!(!ui.emit(link, "keypress").is_default_prevented());
}

#[test]
fn handler_may_destroy_ancestors_mid_dispatch() {
    let mut ui = ui();
    let reached_root = Rc::new(Cell::new(false));
    let flag = Rc::clone(&reached_root);

    let leaf = ui.create("button").id();
    let middle = ui.create("div").child(leaf).unwrap().id();
    let root = ui
        .create("section")
        .on("click", move |_, _| flag.set(true))
        .child(middle)
        .unwrap()
        .id();
    ui.add_event_listener(leaf, "click", move |ui, _| {
        ui.destroy(root).unwrap();
    })
    .unwrap();

    ui.emit(leaf, "click");
    assert!(!reached_root.get());
    assert_eq!(ui.node_count(), 0);
}

#[test]
fn handlers_added_during_dispatch_run_next_time() {
    let mut ui = ui();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let button = ui.create("button").id();
    ui.add_event_listener(button, "click", move |ui, event| {
        let counter = Rc::clone(&counter);
        let target = event.current_target().unwrap();
        ui.add_event_listener(target, "click", move |_, _| counter.set(counter.get() + 1))
            .unwrap();
    })
    .unwrap();

    ui.emit(button, "click");
    assert_eq!(hits.get(), 0);
    assert_eq!(ui.listener_count(button, "click"), 2);

    ui.emit(button, "click");
    assert_eq!(hits.get(), 1);
    assert_eq!(ui.listener_count(button, "click"), 3);
}

#[test]
fn platform_events_are_routed_by_element() {
    let mut ui = ui();
    let clicked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&clicked);
    let id = ui.create("button").on("click", move |_, _| flag.set(true)).id();
    let body = ui.body();
    let element = ui.render(id, body).unwrap();

    assert!(ui.dispatch_element(element, Event::new("click")).is_some());
    assert!(clicked.get());
    assert!(ui.dispatch_element(body, Event::new("click")).is_none());
}

#[test]
fn closest_walks_ancestors() {
    let mut ui = ui();
    let text = ui.create("span").id();
    let link = ui.create("a").child(text).unwrap().id();
    ui.create("nav").child(link).unwrap();

    assert_eq!(ui.closest(text, "a"), Some(link));
    assert_eq!(ui.closest(link, "A"), Some(link));
    assert_eq!(ui.closest(text, "table"), None);
}

// ============================================================================
// State & effects
// ============================================================================

#[test]
fn watched_state_updates_tree_after_dispatch() {
    let mut ui = ui();
    let count = State::new(0_u32);

    let label = ui.create("span").text("0").id();
    ui.watch(&count, move |ui, value| {
        ui.set_text(label, format!("{value}")).unwrap();
    });

    let handle = count.clone();
    let button = ui
        .create("button")
        .on("click", move |_, _| {
            handle.update(|v| v + 1);
        })
        .id();

    ui.emit(button, "click");
    ui.emit(button, "click");
    assert_eq!(ui.text(label), Some("2"));

    count.set(10);
    assert_eq!(ui.effects().len(), 1);
    ui.flush();
    assert_eq!(ui.text(label), Some("10"));
    assert!(ui.effects().is_empty());
}

// ============================================================================
// Component bookkeeping
// ============================================================================

#[test]
fn enabled_and_visible_translate_to_styles() {
    let mut ui = ui();
    let id = ui.create_widget("button").enabled(false).id();

    assert!(!ui.is_enabled(id));
    assert_eq!(ui.attribute(id, "disabled"), Some("true"));
    assert_eq!(ui.style(id, "opacity"), Some("0.6"));
    assert_eq!(ui.style(id, "pointer-events"), Some("none"));
    assert_eq!(ui.style(id, "box-sizing"), Some("border-box"));

    ui.set_enabled(id, true).unwrap();
    assert_eq!(ui.attribute(id, "disabled"), None);
    assert_eq!(ui.style(id, "opacity"), Some("1.0"));

    let body = ui.body();
    let element = ui.render(id, body).unwrap();
    ui.set_visible(id, false).unwrap();
    assert_eq!(ui.dom().style(element, "display").as_deref(), Some("none"));
    ui.set_visible(id, true).unwrap();
    assert_eq!(ui.dom().style(element, "display"), None);
    assert!(ui.is_visible(id));
}

#[test]
fn shorthands_write_pixel_styles() {
    let mut ui = ui();
    let id = ui
        .create("div")
        .size(120, 40)
        .font_size(14)
        .tooltip("hint")
        .dom_id("main")
        .id();

    assert_eq!(ui.style(id, "width"), Some("120px"));
    assert_eq!(ui.style(id, "height"), Some("40px"));
    assert_eq!(ui.style(id, "font-size"), Some("14px"));
    assert_eq!(ui.attribute(id, "title"), Some("hint"));
    assert_eq!(ui.attribute(id, "id"), Some("main"));
}

#[test]
fn failing_setters_do_not_break_the_chain() {
    let mut ui = ui();
    let id = ui.create("div").id();
    ui.destroy(id).unwrap();

    // Every setter on a stale node is logged and skipped.
    let stale = ui.node(id).text("x").style("color", "red").id();
    assert_eq!(stale, id);
    assert_eq!(ui.text(id), None);
}

proptest! {
    #[test]
    fn render_preserves_append_order(texts in proptest::collection::vec("[a-z]{1,8}", 0..16)) {
        let mut ui = ui();
        let parent = ui.create("div").id();
        for text in &texts {
            let child = ui.create("span").text(text.clone()).id();
            ui.add_child(parent, child).unwrap();
        }

        let body = ui.body();
        ui.render(parent, body).unwrap();
        prop_assert_eq!(rendered_texts(&ui, parent), texts);
    }

    #[test]
    fn late_children_follow_early_ones(
        early in proptest::collection::vec("[a-z]{1,4}", 0..6),
        late in proptest::collection::vec("[a-z]{1,4}", 0..6),
    ) {
        let mut ui = ui();
        let parent = ui.create("div").id();
        for text in &early {
            let child = ui.create("span").text(text.clone()).id();
            ui.add_child(parent, child).unwrap();
        }
        let body = ui.body();
        ui.render(parent, body).unwrap();
        for text in &late {
            let child = ui.create("span").text(text.clone()).id();
            ui.add_child(parent, child).unwrap();
        }

        let expected: Vec<String> = early.iter().chain(&late).cloned().collect();
        prop_assert_eq!(rendered_texts(&ui, parent), expected);
    }
}
