use crate::components::fields::input_value;
use crate::hooks::use_category_tags;
use crate::state::{notify, report_error, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use shared::CreateCategoryTagRequest;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CategoryTagsPanelProps {
    /// A top-level expense category
    pub category_id: i64,
}

/// Name to submit, or why it cannot be submitted
pub fn validate_tag_name(name: &str, max_length: usize) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Tag name is required".to_string());
    }
    if name.chars().count() > max_length {
        return Err(format!("Tag name must be at most {} characters", max_length));
    }
    Ok(name.to_string())
}

#[function_component(CategoryTagsPanel)]
pub fn category_tags_panel(props: &CategoryTagsPanelProps) -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let tags = use_category_tags(Some(props.category_id));
    let new_name = use_state(String::new);
    let saving = use_state(|| false);

    let on_add = {
        let app = app.clone();
        let api = api.clone();
        let new_name = new_name.clone();
        let saving = saving.clone();
        let category_id = props.category_id;
        let max_length = config.max_tag_name_length;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let name = match validate_tag_name(&new_name, max_length) {
                Ok(name) => name,
                Err(message) => {
                    notify(&app, NoticeLevel::Warning, message);
                    return;
                }
            };

            saving.set(true);
            let app = app.clone();
            let api = api.clone();
            let new_name = new_name.clone();
            let saving = saving.clone();
            spawn_local(async move {
                let request = CreateCategoryTagRequest { name, is_active: true };
                match api.create_category_tag(category_id, &request).await {
                    Ok(_) => {
                        new_name.set(String::new());
                        notify(&app, NoticeLevel::Success, "Tag saved");
                        app.dispatch(AppAction::Invalidate(Resource::CategoryTags));
                    }
                    Err(e) => report_error(&app, "category_tags_panel", &e),
                }
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let app = app.clone();
        let api = api.clone();
        let category_id = props.category_id;
        Callback::from(move |tag_id: i64| {
            let app = app.clone();
            let api = api.clone();
            spawn_local(async move {
                match api.delete_category_tag(category_id, tag_id).await {
                    Ok(()) => {
                        notify(&app, NoticeLevel::Success, "Tag removed or deactivated");
                        app.dispatch(AppAction::Invalidate(Resource::CategoryTags));
                    }
                    Err(e) => report_error(&app, "category_tags_panel", &e),
                }
            });
        })
    };

    html! {
        <div class="category-tags-panel">
            <h4>{"Tags for this top-level expense category"}</h4>
            <form class="inline-form" onsubmit={on_add}>
                <input
                    type="text"
                    placeholder="e.g. takeaway, dinner party"
                    maxlength={config.max_tag_name_length.to_string()}
                    value={(*new_name).clone()}
                    oninput={let new_name = new_name.clone(); Callback::from(move |e: InputEvent| new_name.set(input_value(&e)))}
                    disabled={*saving}
                />
                <button type="submit" class="btn btn-primary" disabled={*saving || new_name.trim().is_empty()}>
                    {"Add"}
                </button>
            </form>
            {if tags.loading {
                html! { <p class="muted">{"Loading tags..."}</p> }
            } else if tags.tags.is_empty() {
                html! { <p class="muted">{"No tags yet"}</p> }
            } else {
                html! {
                    <div class="tag-list">
                        {for tags.tags.iter().map(|tag| {
                            let id = tag.id;
                            let onclick = on_delete.reform(move |_: MouseEvent| id);
                            html! {
                                <span class={classes!("tag-chip", (!tag.is_active).then_some("inactive"))} key={id.to_string()}>
                                    {&tag.name}
                                    {if tag.is_active {
                                        html! { <button class="tag-remove" title="Remove" {onclick}>{"×"}</button> }
                                    } else {
                                        html! { <span class="muted">{" (inactive)"}</span> }
                                    }}
                                </span>
                            }
                        })}
                    </div>
                }
            }}
            <p class="hint">{"Tags already used by transactions are deactivated instead of deleted."}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_name() {
        assert_eq!(validate_tag_name("  takeaway ", 100), Ok("takeaway".to_string()));
        assert!(validate_tag_name("   ", 100).is_err());
        assert!(validate_tag_name("abcdef", 5).is_err());
    }
}
