use crate::components::category_leaf_select::CategoryLeafSelect;
use crate::components::fields::{check_note_length, input_value, textarea_value};
use crate::components::tag_picker::{toggle_tag, TagPicker};
use crate::hooks::{use_category_tags, use_category_tree};
use crate::services::date_utils::{input_to_rfc3339, rfc3339_to_input};
use crate::state::{inline_or_report, use_api, use_app, use_config, AppAction, Resource};
use chrono::FixedOffset;
use shared::{CategoryType, TransactionRow, TransactionType, UpdateTransactionRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EditTransactionModalProps {
    pub row: TransactionRow,
    pub offset: FixedOffset,
    pub on_close: Callback<()>,
}

/// Edits time, category, tags and note of an income or expense entry
#[function_component(EditTransactionModal)]
pub fn edit_transaction_modal(props: &EditTransactionModalProps) -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let is_expense = props.row.transaction_type == TransactionType::Expense;
    let category_type = props
        .row
        .transaction_type
        .category_type()
        .unwrap_or(CategoryType::Expense);

    let tree = use_category_tree(category_type);
    let occurred_at = use_state(|| rfc3339_to_input(&props.row.occurred_at, props.offset));
    let category_id = use_state(|| props.row.category_id);
    let tag_ids = use_state(|| props.row.tag_ids.clone());
    let note = use_state(|| props.row.note.clone().unwrap_or_default());
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let top_level = category_id.and_then(|id| tree.forest.top_level_ancestor(id));
    let tags = use_category_tags(if is_expense { top_level } else { None });

    let on_category_change = {
        let category_id = category_id.clone();
        let tag_ids = tag_ids.clone();
        let forest = tree.forest.clone();
        Callback::from(move |next: Option<i64>| {
            let old_top = category_id.and_then(|id| forest.top_level_ancestor(id));
            let new_top = next.and_then(|id| forest.top_level_ancestor(id));
            if old_top != new_top {
                tag_ids.set(Vec::new());
            }
            category_id.set(next);
        })
    };

    let on_save = {
        let app = app.clone();
        let occurred_at = occurred_at.clone();
        let category_id = category_id.clone();
        let tag_ids = tag_ids.clone();
        let note = note.clone();
        let saving = saving.clone();
        let error = error.clone();
        let on_close = props.on_close.clone();
        let id = props.row.id;
        let offset = props.offset;
        let max_note = config.max_note_length;
        let forest = tree.forest.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let Some(when) = input_to_rfc3339(&occurred_at, offset) else {
                error.set(Some("Please enter a valid time".to_string()));
                return;
            };
            let Some(category) = *category_id else {
                error.set(Some("Please choose a category".to_string()));
                return;
            };
            if !forest.find_node(category).is_some_and(|n| n.is_leaf() && n.is_active) {
                error.set(Some("Only active leaf categories can be used".to_string()));
                return;
            }
            if let Err(message) = check_note_length(&note, max_note) {
                error.set(Some(message));
                return;
            }

            let request = UpdateTransactionRequest {
                occurred_at: Some(when),
                category_id: Some(category),
                tag_ids: is_expense.then(|| (*tag_ids).clone()),
                note: Some(note.trim().to_string()),
            };

            saving.set(true);
            error.set(None);
            let app = app.clone();
            let api = api.clone();
            let saving = saving.clone();
            let error = error.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match api.update_transaction(id, &request).await {
                    Ok(_) => {
                        app.dispatch(AppAction::Invalidate(Resource::Transactions));
                        app.dispatch(AppAction::Invalidate(Resource::Stats));
                        on_close.emit(());
                    }
                    Err(e) => error.set(inline_or_report(&app, "edit_transaction_modal", &e)),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h3>{format!("Edit {} #{}", props.row.transaction_type.label().to_lowercase(), props.row.id)}</h3>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}
                <form onsubmit={on_save}>
                    <div class="form-group">
                        <label>{"Time"}</label>
                        <input
                            type="datetime-local"
                            value={(*occurred_at).clone()}
                            oninput={let occurred_at = occurred_at.clone(); Callback::from(move |e: InputEvent| occurred_at.set(input_value(&e)))}
                        />
                    </div>
                    <div class="form-group">
                        <label>{"Category"}</label>
                        <CategoryLeafSelect forest={tree.forest.clone()} value={*category_id} onchange={on_category_change} />
                    </div>
                    {if is_expense {
                        html! {
                            <div class="form-group">
                                <label>{"Tags"}</label>
                                <TagPicker
                                    tags={tags.active().cloned().collect::<Vec<_>>()}
                                    selected={(*tag_ids).clone()}
                                    loading={tags.loading}
                                    on_toggle={let tag_ids = tag_ids.clone(); Callback::from(move |id| tag_ids.set(toggle_tag(&tag_ids, id)))}
                                />
                            </div>
                        }
                    } else { html! {} }}
                    <div class="form-group">
                        <label>{"Note"}</label>
                        <textarea
                            rows="3"
                            value={(*note).clone()}
                            oninput={let note = note.clone(); Callback::from(move |e: InputEvent| note.set(textarea_value(&e)))}
                        />
                    </div>
                    <div class="button-row">
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            {if *saving { "Saving..." } else { "Save" }}
                        </button>
                        <button type="button" class="btn btn-secondary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                            {"Cancel"}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
