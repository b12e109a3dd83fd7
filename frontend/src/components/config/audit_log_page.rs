use crate::components::fields::{input_value, parse_id, select_value};
use crate::components::pagination_bar::PaginationBar;
use crate::hooks::FetchGuard;
use crate::services::date_utils::{format_timestamp, local_offset};
use crate::state::{report_error, use_api, use_app, use_config, Resource};
use shared::query::SortOrder;
use shared::{AuditAction, AuditLogEntry, AuditLogPage, AuditLogQuery, TransactionType};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const ACTIONS: [AuditAction; 3] = [AuditAction::Create, AuditAction::Update, AuditAction::Delete];
const TX_TYPES: [TransactionType; 4] = [
    TransactionType::Expense,
    TransactionType::Income,
    TransactionType::Transfer,
    TransactionType::Refund,
];

fn action_from_key(key: &str) -> Option<AuditAction> {
    ACTIONS.into_iter().find(|a| a.as_str() == key)
}

fn tx_type_from_key(key: &str) -> Option<TransactionType> {
    TX_TYPES.into_iter().find(|t| t.as_str() == key)
}

/// Pretty JSON of a before/after snapshot, or a dash when absent
pub fn snapshot_text(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        None => "-".to_string(),
    }
}

fn render_entry(entry: &AuditLogEntry, expanded: bool, on_toggle: Callback<MouseEvent>) -> Html {
    html! {
        <>
            <tr class={classes!("audit-row", entry.action.as_str())}>
                <td>{format_timestamp(&entry.created_at, local_offset())}</td>
                <td>{entry.action.as_str()}</td>
                <td>{entry.tx_type.map(|t| t.label()).unwrap_or("-")}</td>
                <td>{entry.transaction_id.map(|id| format!("#{}", id)).unwrap_or_default()}</td>
                <td>{entry.actor_user_id.to_string()}</td>
                <td>{entry.target_user_id.to_string()}</td>
                <td class="actions">
                    <button class="btn btn-link" onclick={on_toggle}>
                        {if expanded { "Hide" } else { "Details" }}
                    </button>
                </td>
            </tr>
            {if expanded {
                html! {
                    <tr class="audit-detail">
                        <td colspan="7">
                            <div class="audit-snapshots">
                                <div>
                                    <h4>{"Before"}</h4>
                                    <pre>{snapshot_text(entry.before.as_ref())}</pre>
                                </div>
                                <div>
                                    <h4>{"After"}</h4>
                                    <pre>{snapshot_text(entry.after.as_ref())}</pre>
                                </div>
                            </div>
                        </td>
                    </tr>
                }
            } else { html! {} }}
        </>
    }
}

#[function_component(AuditLogView)]
pub fn audit_log_view() -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let query = use_state(|| AuditLogQuery::new(config.default_page_size));
    let page = use_state(AuditLogPage::default);
    let loading = use_state(|| false);
    let expanded = use_state(|| None::<i64>);
    let transaction_input = use_state(String::new);
    let generation = app.generation(Resource::AuditLogs);

    use_effect_with(((*query).clone(), generation), {
        let app = app.clone();
        let page = page.clone();
        let loading = loading.clone();
        move |(query, _)| {
            let query = query.clone();
            let guard = FetchGuard::new();
            loading.set(true);
            let in_flight = guard.clone();
            spawn_local(async move {
                let result = api.audit_logs(&query).await;
                if !in_flight.is_current() {
                    return;
                }
                match result {
                    Ok(result) => page.set(result),
                    Err(e) => {
                        report_error(&app, "audit_log_page", &e);
                        page.set(AuditLogPage::default());
                    }
                }
                loading.set(false);
            });
            guard.canceller()
        }
    });

    let update = |apply: fn(&mut AuditLogQuery, String)| {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let mut next = (*query).clone();
            apply(&mut next, select_value(&e));
            next.page = 1;
            query.set(next);
        })
    };

    let on_search = {
        let query = query.clone();
        let transaction_input = transaction_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            query.set(AuditLogQuery {
                transaction_id: parse_id(&transaction_input),
                page: 1,
                ..(*query).clone()
            });
        })
    };

    let on_page = {
        let query = query.clone();
        Callback::from(move |(next_page, next_size): (u64, u64)| {
            query.set(AuditLogQuery {
                page: next_page,
                page_size: next_size,
                ..(*query).clone()
            });
        })
    };

    let toggle = |id: i64| {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| {
            expanded.set(if *expanded == Some(id) { None } else { Some(id) });
        })
    };

    let pagination = config.pagination();

    html! {
        <div class="config-page audit-log">
            <form class="filter-bar" onsubmit={on_search}>
                <select onchange={update(|q, v| q.action = action_from_key(&v))}>
                    <option value="" selected={query.action.is_none()}>{"All actions"}</option>
                    {for ACTIONS.into_iter().map(|action| html! {
                        <option value={action.as_str()} selected={query.action == Some(action)}>{action.as_str()}</option>
                    })}
                </select>
                <select onchange={update(|q, v| q.tx_type = tx_type_from_key(&v))}>
                    <option value="" selected={query.tx_type.is_none()}>{"All types"}</option>
                    {for TX_TYPES.into_iter().map(|t| html! {
                        <option value={t.as_str()} selected={query.tx_type == Some(t)}>{t.label()}</option>
                    })}
                </select>
                <select onchange={update(|q, v| q.order = if v == "asc" { SortOrder::Asc } else { SortOrder::Desc })}>
                    <option value="desc" selected={query.order == SortOrder::Desc}>{"Newest first"}</option>
                    <option value="asc" selected={query.order == SortOrder::Asc}>{"Oldest first"}</option>
                </select>
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Transaction id"
                    value={(*transaction_input).clone()}
                    oninput={let transaction_input = transaction_input.clone(); Callback::from(move |e: InputEvent| transaction_input.set(input_value(&e)))}
                />
                <button type="submit" class="btn btn-secondary">{"Search"}</button>
            </form>
            {if *loading && page.items.is_empty() {
                html! { <div class="loading">{"Loading audit log..."}</div> }
            } else if page.items.is_empty() {
                html! { <div class="empty">{"No audit entries"}</div> }
            } else {
                html! {
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>{"Time"}</th>
                                <th>{"Action"}</th>
                                <th>{"Type"}</th>
                                <th>{"Transaction"}</th>
                                <th>{"Actor"}</th>
                                <th>{"Owner"}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {for page.items.iter().map(|entry| render_entry(entry, *expanded == Some(entry.id), toggle(entry.id)))}
                        </tbody>
                    </table>
                }
            }}
            <PaginationBar
                page={query.page}
                page_size={query.page_size}
                total={page.total}
                page_size_options={pagination.page_size_options.clone()}
                max_pages={pagination.max_pages}
                onchange={on_page}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keys() {
        assert_eq!(action_from_key("delete"), Some(AuditAction::Delete));
        assert_eq!(action_from_key(""), None);
        assert_eq!(tx_type_from_key("refund"), Some(TransactionType::Refund));
        assert_eq!(tx_type_from_key("loan"), None);
    }

    #[test]
    fn test_snapshot_text() {
        assert_eq!(snapshot_text(None), "-");
        let value = serde_json::json!({"amountCents": 500});
        assert_eq!(snapshot_text(Some(&value)), "{\n  \"amountCents\": 500\n}");
    }
}
