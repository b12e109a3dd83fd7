use super::edit_transaction_modal::EditTransactionModal;
use super::filter_bar::{FilterBar, ListFilters};
use super::refund_modal::RefundModal;
use super::transaction_table::TransactionTable;
use crate::components::pagination_bar::PaginationBar;
use crate::hooks::{use_bank_accounts, use_category_tree, use_transactions};
use crate::services::date_utils::{local_offset, today};
use crate::services::Logger;
use crate::state::{notify, report_error, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use chrono::{FixedOffset, NaiveDate};
use gloo::timers::future::TimeoutFuture;
use shared::grouping::group_by_date;
use shared::query::TransactionListQuery;
use shared::{format_cents, CategoryType, PageTotals, TransactionRow};
use std::collections::HashMap;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Query for one page of the list under `filters`
pub fn build_query(
    filters: &ListFilters,
    page: u64,
    page_size: u64,
    today: NaiveDate,
    offset: FixedOffset,
) -> TransactionListQuery {
    TransactionListQuery {
        type_filter: filters.type_filter,
        funding_source: filters.funding,
        bank_account_id: filters.bank_account_id,
        page,
        ..TransactionListQuery::new(page_size)
    }
    .with_range(filters.preset.map(|p| p.range(today)), offset)
    .with_keyword(&filters.keyword)
}

#[function_component(TransactionList)]
pub fn transaction_list() -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let offset = local_offset();

    let filters = use_state(ListFilters::default);
    let page = use_state(|| 1u64);
    let page_size = use_state(|| config.default_page_size);
    let group_by_day = use_state(|| false);
    let editing = use_state(|| None::<TransactionRow>);
    let refunding = use_state(|| None::<TransactionRow>);

    let query = build_query(&filters, *page, *page_size, today(), offset);
    let transactions = use_transactions(query);
    let bank_accounts = use_bank_accounts();
    let expense_tree = use_category_tree(CategoryType::Expense);
    let income_tree = use_category_tree(CategoryType::Income);

    let category_paths = use_memo(
        (expense_tree.forest.clone(), income_tree.forest.clone()),
        |(expense, income)| {
            let mut paths = expense.path_map();
            paths.extend(income.path_map());
            paths
        },
    );
    let bank_names = use_memo(bank_accounts.accounts.clone(), |accounts| {
        accounts
            .iter()
            .map(|a| (a.id, a.display_name()))
            .collect::<HashMap<_, _>>()
    });

    // A new entry sorts to the top, so show the first page while it is highlighted
    use_effect_with(app.flash_transaction, {
        let app = app.clone();
        let page = page.clone();
        let duration = config.flash_duration_ms;
        move |flash| {
            if let Some(id) = *flash {
                page.set(1);
                spawn_local(async move {
                    TimeoutFuture::new(duration).await;
                    app.dispatch(AppAction::ClearFlash(id));
                });
            }
            || ()
        }
    });

    let on_filters = {
        let filters = filters.clone();
        let page = page.clone();
        Callback::from(move |next: ListFilters| {
            page.set(1);
            filters.set(next);
        })
    };

    let on_page = {
        let page = page.clone();
        let page_size = page_size.clone();
        Callback::from(move |(next_page, next_size): (u64, u64)| {
            page_size.set(next_size);
            page.set(next_page);
        })
    };

    let on_toggle_group = {
        let group_by_day = group_by_day.clone();
        Callback::from(move |_: Event| group_by_day.set(!*group_by_day))
    };

    let on_delete = {
        let app = app.clone();
        let api = api.clone();
        Callback::from(move |row: TransactionRow| {
            let prompt = format!(
                "Delete this {} of {}? This cannot be undone.",
                row.transaction_type.label().to_lowercase(),
                format_cents(row.amount_cents)
            );
            if !gloo::dialogs::confirm(&prompt) {
                return;
            }
            let app = app.clone();
            let api = api.clone();
            spawn_local(async move {
                match api.delete_transaction(row.id).await {
                    Ok(()) => {
                        Logger::info_with_component("transaction_list", &format!("deleted transaction {}", row.id));
                        notify(&app, NoticeLevel::Success, "Transaction deleted");
                        for resource in [Resource::Transactions, Resource::BankAccounts, Resource::Stats, Resource::AuditLogs] {
                            app.dispatch(AppAction::Invalidate(resource));
                        }
                    }
                    Err(e) => report_error(&app, "transaction_list", &e),
                }
            });
        })
    };

    let page_data = &transactions.page;
    let totals = if *group_by_day {
        PageTotals::from_groups(&group_by_date(&page_data.items, offset))
    } else {
        PageTotals::from_page(page_data)
    };
    let symbol = config.currency_symbol.clone();
    let pagination = config.pagination();

    html! {
        <div class="transaction-list">
            <FilterBar
                filters={(*filters).clone()}
                bank_accounts={bank_accounts.accounts.clone()}
                onchange={on_filters}
            />
            <div class="list-toolbar">
                <label class="checkbox">
                    <input type="checkbox" checked={*group_by_day} onchange={on_toggle_group} />
                    {"Group by day"}
                </label>
                <div class="totals">
                    <span class="positive">{format!("Income {}{}", symbol, format_cents(totals.income_cents))}</span>
                    <span class="negative">{format!("Expense {}{}", symbol, format_cents(totals.expense_cents))}</span>
                    <span class="muted">
                        {if *group_by_day { "(this page)" } else { "(all matching)" }}
                    </span>
                </div>
            </div>
            <TransactionTable
                rows={page_data.items.clone()}
                refund_items={page_data.refund_items.clone()}
                group_by_date={*group_by_day}
                offset={offset}
                category_paths={category_paths}
                bank_names={bank_names}
                currency_symbol={AttrValue::from(symbol.clone())}
                flash={app.flash_transaction}
                loading={transactions.loading}
                on_edit={let editing = editing.clone(); Callback::from(move |row| editing.set(Some(row)))}
                on_refund={let refunding = refunding.clone(); Callback::from(move |row| refunding.set(Some(row)))}
                on_delete={on_delete}
            />
            <PaginationBar
                page={*page}
                page_size={*page_size}
                total={page_data.total}
                page_size_options={pagination.page_size_options.clone()}
                max_pages={pagination.max_pages}
                onchange={on_page}
            />
            {if let Some(row) = (*editing).clone() {
                html! {
                    <EditTransactionModal
                        row={row}
                        offset={offset}
                        on_close={let editing = editing.clone(); Callback::from(move |_| editing.set(None))}
                    />
                }
            } else { html! {} }}
            {if let Some(row) = (*refunding).clone() {
                html! {
                    <RefundModal
                        row={row}
                        offset={offset}
                        currency_symbol={AttrValue::from(symbol)}
                        on_close={let refunding = refunding.clone(); Callback::from(move |_| refunding.set(None))}
                    />
                }
            } else { html! {} }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::query::{FundingFilter, TypeFilter};
    use shared::DatePreset;

    fn plus8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_build_query_applies_filters() {
        let filters = ListFilters {
            type_filter: TypeFilter::Expense,
            funding: FundingFilter::Bank,
            bank_account_id: Some(3),
            preset: Some(DatePreset::ThisMonth),
            keyword: "  lunch ".to_string(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let query = build_query(&filters, 2, 20, today, plus8());

        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.bank_account_id, Some(3));
        assert_eq!(query.keyword.as_deref(), Some("lunch"));
        assert_eq!(query.start.as_deref(), Some("2024-02-01T00:00:00+08:00"));
        assert!(query.end.as_deref().is_some_and(|end| end.starts_with("2024-02-29T23:59:59")));
    }

    #[test]
    fn test_build_query_all_time_has_no_bounds() {
        let filters = ListFilters {
            preset: None,
            ..ListFilters::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let query = build_query(&filters, 1, 50, today, plus8());
        assert_eq!(query.start, None);
        assert_eq!(query.end, None);
        assert_eq!(query.keyword, None);
    }
}
