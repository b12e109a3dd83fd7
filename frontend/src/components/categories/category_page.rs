use super::category_tags_panel::CategoryTagsPanel;
use super::category_tree_view::CategoryTreeView;
use crate::components::fields::input_value;
use crate::hooks::use_category_tree;
use crate::services::Logger;
use crate::state::{
    inline_or_report, notify, report_error, use_api, use_app, AppAction, AppContext, NoticeLevel, Resource,
};
use shared::move_planner::plan_move;
use shared::{ApiError, CategoryType, CreateCategoryRequest, DropGesture, UpdateCategoryRequest};
use std::future::Future;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Run a category mutation, then re-fetch the tree whatever the outcome
fn mutate_tree<F>(app: AppContext, success: &'static str, request: F)
where
    F: Future<Output = Result<(), ApiError>> + 'static,
{
    spawn_local(async move {
        match request.await {
            Ok(()) => notify(&app, NoticeLevel::Success, success),
            Err(e) => report_error(&app, "category_page", &e),
        }
        app.dispatch(AppAction::Invalidate(Resource::CategoryTree));
    });
}

/// Create or rename: validation failures stay next to the name input in
/// `error`, and `on_saved` runs only when the server accepted the name.
fn save_name<F, S>(
    app: AppContext,
    error: UseStateHandle<Option<String>>,
    success: &'static str,
    on_saved: S,
    request: F,
)
where
    F: Future<Output = Result<(), ApiError>> + 'static,
    S: FnOnce() + 'static,
{
    spawn_local(async move {
        match request.await {
            Ok(()) => {
                error.set(None);
                on_saved();
                notify(&app, NoticeLevel::Success, success);
                app.dispatch(AppAction::Invalidate(Resource::CategoryTree));
            }
            Err(e) => error.set(inline_or_report(&app, "category_page", &e)),
        }
    });
}

/// Trimmed category name, or why it cannot be saved
pub fn category_name(input: &str) -> Result<String, String> {
    let name = input.trim();
    if name.is_empty() {
        return Err("Category name is required".to_string());
    }
    Ok(name.to_string())
}

#[function_component(CategoryPage)]
pub fn category_page() -> Html {
    let app = use_app();
    let api = use_api();
    let category_type = use_state(|| CategoryType::Expense);
    let tree = use_category_tree(*category_type);
    let selected = use_state(|| None::<i64>);
    let new_name = use_state(String::new);
    let rename_to = use_state(|| None::<String>);
    let create_error = use_state(|| None::<String>);
    let rename_error = use_state(|| None::<String>);

    let forest = tree.forest.clone();
    let selected_entry = selected.and_then(|id| forest.find_node(id)).cloned();

    // A selection that disappeared after a re-fetch is dropped
    {
        let selected = selected.clone();
        let still_there = selected_entry.is_some();
        use_effect_with(still_there, move |still_there| {
            if !*still_there && selected.is_some() {
                selected.set(None);
            }
            || ()
        });
    }

    let switch_type = |target: CategoryType| {
        let category_type = category_type.clone();
        let selected = selected.clone();
        let create_error = create_error.clone();
        Callback::from(move |_: MouseEvent| {
            category_type.set(target);
            selected.set(None);
            create_error.set(None);
        })
    };

    let on_drop = {
        let app = app.clone();
        let api = api.clone();
        let forest = forest.clone();
        Callback::from(move |gesture: DropGesture| {
            match plan_move(&forest, gesture) {
                Ok(intent) => {
                    Logger::info_with_component(
                        "category_page",
                        &format!("moving category {} to {:?}#{}", intent.node_id, intent.parent_id, intent.index),
                    );
                    let api = api.clone();
                    mutate_tree(app.clone(), "Category moved", async move {
                        api.move_category(intent.node_id, &intent.to_request()).await
                    });
                }
                Err(rejection) => notify(&app, NoticeLevel::Warning, rejection.to_string()),
            }
        })
    };

    let on_create = {
        let app = app.clone();
        let api = api.clone();
        let new_name = new_name.clone();
        let create_error = create_error.clone();
        let category_type = *category_type;
        let parent_id = *selected;
        Callback::from(move |as_child: bool| {
            let name = match category_name(&new_name) {
                Ok(name) => name,
                Err(message) => {
                    create_error.set(Some(message));
                    return;
                }
            };
            let request = CreateCategoryRequest {
                category_type,
                name,
                parent_id: if as_child { parent_id } else { None },
                sort_order: None,
                is_active: true,
            };
            let api = api.clone();
            let new_name = new_name.clone();
            save_name(
                app.clone(),
                create_error.clone(),
                "Category created",
                move || new_name.set(String::new()),
                async move { api.create_category(&request).await.map(|_| ()) },
            );
        })
    };

    let on_rename = {
        let app = app.clone();
        let api = api.clone();
        let rename_to = rename_to.clone();
        let rename_error = rename_error.clone();
        let selected = *selected;
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(id), Some(input)) = (selected, rename_to.as_ref()) else {
                return;
            };
            let name = match category_name(input) {
                Ok(name) => name,
                Err(message) => {
                    rename_error.set(Some(message));
                    return;
                }
            };
            let request = UpdateCategoryRequest {
                name: Some(name),
                ..UpdateCategoryRequest::default()
            };
            let api = api.clone();
            let rename_to = rename_to.clone();
            save_name(
                app.clone(),
                rename_error.clone(),
                "Category renamed",
                move || rename_to.set(None),
                async move { api.update_category(id, &request).await },
            );
        })
    };

    let detail = match &selected_entry {
        None => html! { <p class="muted">{"Select a category on the left to edit it"}</p> },
        Some(entry) => {
            let id = entry.id;
            let is_active = entry.is_active;
            let is_leaf = entry.is_leaf();
            let path = forest.path_names(id).unwrap_or_else(|| entry.name.clone());
            let show_tags = entry.category_type == CategoryType::Expense && forest.is_top_level(id);

            let on_toggle_active = {
                let app = app.clone();
                let api = api.clone();
                Callback::from(move |_: MouseEvent| {
                    let request = UpdateCategoryRequest {
                        is_active: Some(!is_active),
                        ..UpdateCategoryRequest::default()
                    };
                    let api = api.clone();
                    let message = if is_active { "Category deactivated" } else { "Category activated" };
                    mutate_tree(app.clone(), message, async move { api.update_category(id, &request).await });
                })
            };
            let on_delete = {
                let app = app.clone();
                let api = api.clone();
                Callback::from(move |_: MouseEvent| {
                    if !gloo::dialogs::confirm(
                        "Delete this category? If transactions use it, it is deactivated instead.",
                    ) {
                        return;
                    }
                    let api = api.clone();
                    mutate_tree(app.clone(), "Category deleted or deactivated", async move {
                        api.delete_category(id).await
                    });
                })
            };
            let start_rename = {
                let rename_to = rename_to.clone();
                let rename_error = rename_error.clone();
                let name = entry.name.clone();
                Callback::from(move |_: MouseEvent| {
                    rename_error.set(None);
                    rename_to.set(Some(name.clone()));
                })
            };

            html! {
                <div class="category-detail">
                    <h3>{entry.name.clone()}</h3>
                    <p class="muted">
                        {format!("{} · ID {} · {}", path, id, if is_leaf { "leaf" } else { "has children" })}
                    </p>
                    {match rename_to.as_ref() {
                        Some(name) => html! {
                            <form class="inline-form" onsubmit={on_rename}>
                                <input
                                    type="text"
                                    value={name.clone()}
                                    oninput={let rename_to = rename_to.clone(); Callback::from(move |e: InputEvent| rename_to.set(Some(input_value(&e))))}
                                />
                                <button type="submit" class="btn btn-primary">{"Save"}</button>
                                <button
                                    type="button"
                                    class="btn btn-secondary"
                                    onclick={let rename_to = rename_to.clone(); Callback::from(move |_: MouseEvent| rename_to.set(None))}
                                >
                                    {"Cancel"}
                                </button>
                                {if let Some(message) = (*rename_error).clone() {
                                    html! { <div class="form-message error">{message}</div> }
                                } else { html! {} }}
                            </form>
                        },
                        None => html! {
                            <div class="button-row">
                                <button class="btn btn-secondary" onclick={start_rename}>{"Rename"}</button>
                                <button class="btn btn-secondary" onclick={on_toggle_active}>
                                    {if is_active { "Deactivate" } else { "Activate" }}
                                </button>
                                <button class="btn btn-danger" onclick={on_delete} disabled={!is_leaf}>
                                    {"Delete (leaf only)"}
                                </button>
                            </div>
                        },
                    }}
                    {if show_tags {
                        html! { <CategoryTagsPanel category_id={id} /> }
                    } else { html! {} }}
                </div>
            }
        }
    };

    html! {
        <section class="category-page">
            <div class="type-switch">
                {for [CategoryType::Expense, CategoryType::Income].into_iter().map(|t| html! {
                    <button
                        class={classes!("btn", if *category_type == t { "btn-primary" } else { "btn-secondary" })}
                        onclick={switch_type(t)}
                    >
                        {format!("{} categories", t.label())}
                    </button>
                })}
            </div>
            <div class="category-layout">
                <div class="card">
                    <form class="inline-form" onsubmit={on_create.reform(|e: SubmitEvent| { e.prevent_default(); false })}>
                        <input
                            type="text"
                            placeholder="New category name"
                            value={(*new_name).clone()}
                            oninput={let new_name = new_name.clone(); Callback::from(move |e: InputEvent| new_name.set(input_value(&e)))}
                        />
                        <button type="submit" class="btn btn-primary">{"Add top-level"}</button>
                        <button
                            type="button"
                            class="btn btn-secondary"
                            disabled={selected.is_none()}
                            onclick={on_create.reform(|_: MouseEvent| true)}
                        >
                            {"Add under selected"}
                        </button>
                        {if let Some(message) = (*create_error).clone() {
                            html! { <div class="form-message error">{message}</div> }
                        } else { html! {} }}
                    </form>
                    <p class="hint">{"Drag a category onto another to nest it, or near a row's edge to reorder."}</p>
                    {if tree.loading && forest.is_empty() {
                        html! { <p class="muted">{"Loading categories..."}</p> }
                    } else {
                        html! {
                            <CategoryTreeView
                                forest={forest.clone()}
                                selected={*selected}
                                on_select={let selected = selected.clone(); Callback::from(move |id| selected.set(Some(id)))}
                                {on_drop}
                                disabled={tree.loading}
                            />
                        }
                    }}
                </div>
                <div class="card">{detail}</div>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_is_trimmed_and_required() {
        assert_eq!(category_name("  Groceries "), Ok("Groceries".to_string()));
        assert_eq!(category_name("   "), Err("Category name is required".to_string()));
        assert!(category_name("").is_err());
    }
}
