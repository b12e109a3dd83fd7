use shared::{CategoryEntry, CategoryForest, DropGesture, DropTarget, GapSide};
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CategoryTreeViewProps {
    pub forest: Rc<CategoryForest>,
    pub selected: Option<i64>,
    pub on_select: Callback<i64>,
    pub on_drop: Callback<DropGesture>,
    #[prop_or_default]
    pub disabled: bool,
}

/// Where the pointer currently is while dragging
#[derive(Debug, Clone, Copy, PartialEq)]
struct DropHint {
    node_id: i64,
    target: DropTarget,
}

fn hint_class(hint: Option<DropHint>, node_id: i64) -> Option<&'static str> {
    match hint {
        Some(h) if h.node_id == node_id => Some(match h.target {
            DropTarget::Onto => "drop-onto",
            DropTarget::Gap(GapSide::Before) => "drop-before",
            DropTarget::Gap(GapSide::After) => "drop-after",
        }),
        _ => None,
    }
}

/// Classify the pointer against the row under it. Listeners are delegated,
/// so the row is found from the event target rather than `current_target`.
fn pointer_target(e: &DragEvent) -> DropTarget {
    let row = e
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(".tree-row").ok().flatten());
    match row {
        Some(row) => {
            let rect = row.get_bounding_client_rect();
            DropTarget::from_pointer(e.client_y() as f64 - rect.top(), rect.height())
        }
        None => DropTarget::Onto,
    }
}

#[derive(Clone)]
struct TreeCallbacks {
    dragging: UseStateHandle<Option<i64>>,
    hint: UseStateHandle<Option<DropHint>>,
    collapsed: UseStateHandle<HashSet<i64>>,
    on_select: Callback<i64>,
    on_drop: Callback<DropGesture>,
    selected: Option<i64>,
    disabled: bool,
}

fn render_node(forest: &CategoryForest, entry: &CategoryEntry, depth: usize, cb: &TreeCallbacks) -> Html {
    let id = entry.id;
    let is_collapsed = cb.collapsed.contains(&id);

    let ondragstart = {
        let dragging = cb.dragging.clone();
        Callback::from(move |e: DragEvent| {
            if let Some(transfer) = e.data_transfer() {
                let _ = transfer.set_data("text/plain", &id.to_string());
            }
            dragging.set(Some(id));
        })
    };
    let ondragover = {
        let hint = cb.hint.clone();
        let dragging = cb.dragging.clone();
        Callback::from(move |e: DragEvent| {
            if dragging.is_none() {
                return;
            }
            e.prevent_default();
            let next = Some(DropHint {
                node_id: id,
                target: pointer_target(&e),
            });
            if *hint != next {
                hint.set(next);
            }
        })
    };
    let ondrop = {
        let hint = cb.hint.clone();
        let dragging = cb.dragging.clone();
        let on_drop = cb.on_drop.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            if let Some(drag_id) = *dragging {
                on_drop.emit(DropGesture {
                    drag_id,
                    drop_id: id,
                    target: pointer_target(&e),
                });
            }
            dragging.set(None);
            hint.set(None);
        })
    };
    let ondragend = {
        let hint = cb.hint.clone();
        let dragging = cb.dragging.clone();
        Callback::from(move |_: DragEvent| {
            dragging.set(None);
            hint.set(None);
        })
    };
    let onclick = cb.on_select.reform(move |_: MouseEvent| id);
    let on_toggle = {
        let collapsed = cb.collapsed.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let mut next = (*collapsed).clone();
            if !next.remove(&id) {
                next.insert(id);
            }
            collapsed.set(next);
        })
    };

    let children: Vec<&CategoryEntry> = forest.children_of(id).collect();

    html! {
        <li class="tree-node" key={id.to_string()}>
            <div
                class={classes!(
                    "tree-row",
                    (cb.selected == Some(id)).then_some("selected"),
                    (!entry.is_active).then_some("inactive"),
                    hint_class(*cb.hint, id),
                )}
                style={format!("padding-left: {}rem", depth as f64 * 1.25)}
                draggable={(!cb.disabled).to_string()}
                {ondragstart}
                {ondragover}
                {ondrop}
                {ondragend}
                {onclick}
            >
                {if entry.is_leaf() {
                    html! { <span class="tree-toggle leaf">{"•"}</span> }
                } else {
                    html! {
                        <span class="tree-toggle" onclick={on_toggle}>
                            {if is_collapsed { "▸" } else { "▾" }}
                        </span>
                    }
                }}
                <span class="tree-label">{&entry.name}</span>
                {if entry.is_active { html! {} } else { html! { <span class="badge">{"inactive"}</span> } }}
            </div>
            {if !children.is_empty() && !is_collapsed {
                html! {
                    <ul class="tree-children">
                        {for children.into_iter().map(|child| render_node(forest, child, depth + 1, cb))}
                    </ul>
                }
            } else { html! {} }}
        </li>
    }
}

/// Category tree with HTML5 drag-and-drop reordering
#[function_component(CategoryTreeView)]
pub fn category_tree_view(props: &CategoryTreeViewProps) -> Html {
    let dragging = use_state(|| None::<i64>);
    let hint = use_state(|| None::<DropHint>);
    let collapsed = use_state(HashSet::<i64>::new);

    if props.forest.is_empty() {
        return html! { <p class="empty">{"No categories yet"}</p> };
    }

    let cb = TreeCallbacks {
        dragging,
        hint,
        collapsed,
        on_select: props.on_select.clone(),
        on_drop: props.on_drop.clone(),
        selected: props.selected,
        disabled: props.disabled,
    };

    html! {
        <ul class="category-tree">
            {for props.forest.roots().map(|root| render_node(&props.forest, root, 0, &cb))}
        </ul>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_class_only_for_hovered_node() {
        let hint = Some(DropHint {
            node_id: 3,
            target: DropTarget::Gap(GapSide::After),
        });
        assert_eq!(hint_class(hint, 3), Some("drop-after"));
        assert_eq!(hint_class(hint, 4), None);
        assert_eq!(hint_class(None, 3), None);
    }
}
