use crate::services::date_utils::format_timestamp;
use chrono::FixedOffset;
use shared::grouping::{group_by_date, refunds_for, refundable_cents};
use shared::money::is_large_amount;
use shared::{format_cents, FundingSource, GroupKey, TransactionRow, TransactionType};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TransactionTableProps {
    pub rows: Vec<TransactionRow>,
    pub refund_items: Vec<TransactionRow>,
    pub group_by_date: bool,
    pub offset: FixedOffset,
    /// Category id -> "A/B/C"
    pub category_paths: Rc<HashMap<i64, String>>,
    pub bank_names: Rc<HashMap<i64, String>>,
    pub currency_symbol: AttrValue,
    #[prop_or_default]
    pub flash: Option<i64>,
    #[prop_or_default]
    pub loading: bool,
    pub on_edit: Callback<TransactionRow>,
    pub on_refund: Callback<TransactionRow>,
    pub on_delete: Callback<TransactionRow>,
}

fn amount_class(row: &TransactionRow) -> Classes {
    let kind = match row.transaction_type {
        TransactionType::Income => "positive",
        TransactionType::Expense => "negative",
        TransactionType::Transfer => "neutral",
        TransactionType::Refund => "positive",
    };
    classes!("amount", kind, is_large_amount(row.amount_cents).then_some("large"))
}

fn funding_text(row: &TransactionRow, bank_names: &HashMap<i64, String>) -> String {
    let bank = |id: Option<i64>| {
        id.and_then(|id| bank_names.get(&id).cloned())
            .unwrap_or_else(|| "Unknown account".to_string())
    };
    match (row.transaction_type, row.funding_source) {
        (TransactionType::Transfer, _) => format!("{} → {}", bank(row.bank_account_id), bank(row.to_bank_account_id)),
        (_, FundingSource::Cash) => FundingSource::Cash.label().to_string(),
        (_, FundingSource::Bank) => bank(row.bank_account_id),
    }
}

fn category_text(row: &TransactionRow, paths: &HashMap<i64, String>) -> String {
    match row.category_id {
        Some(id) => paths.get(&id).cloned().unwrap_or_else(|| format!("#{}", id)),
        None => "—".to_string(),
    }
}

fn render_row(props: &TransactionTableProps, row: &TransactionRow, nested: bool) -> Html {
    let symbol = props.currency_symbol.as_str();
    let on_edit = {
        let on_edit = props.on_edit.clone();
        let row = row.clone();
        Callback::from(move |_: MouseEvent| on_edit.emit(row.clone()))
    };
    let on_refund = {
        let on_refund = props.on_refund.clone();
        let row = row.clone();
        Callback::from(move |_: MouseEvent| on_refund.emit(row.clone()))
    };
    let on_delete = {
        let on_delete = props.on_delete.clone();
        let row = row.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(row.clone()))
    };
    let refunded = row.refunded_cents.unwrap_or(0);

    html! {
        <tr
            class={classes!(
                "tx-row",
                nested.then_some("tx-row-nested"),
                (props.flash == Some(row.id)).then_some("tx-row-flash"),
            )}
        >
            <td class="date">{format_timestamp(&row.occurred_at, props.offset)}</td>
            <td class="type">{row.transaction_type.label()}</td>
            <td class={amount_class(row)}>
                {format!("{}{}", symbol, format_cents(row.amount_cents))}
                {if refunded > 0 {
                    html! {
                        <div class="refunded">
                            {format!("refunded {}{}, {}{} left", symbol, format_cents(refunded), symbol, format_cents(refundable_cents(row)))}
                        </div>
                    }
                } else { html! {} }}
            </td>
            <td class="category">{category_text(row, &props.category_paths)}</td>
            <td class="funding">{funding_text(row, &props.bank_names)}</td>
            <td class="tags">{row.tag_names.join(", ")}</td>
            <td class="note">{row.note.clone().unwrap_or_default()}</td>
            <td class="actions">
                {if row.is_editable() {
                    html! { <button class="btn btn-link" onclick={on_edit}>{"Edit"}</button> }
                } else { html! {} }}
                {if row.is_refundable() {
                    html! { <button class="btn btn-link" onclick={on_refund}>{"Refund"}</button> }
                } else { html! {} }}
                <button class="btn btn-link danger" onclick={on_delete}>{"Delete"}</button>
            </td>
        </tr>
    }
}

/// A row followed by the refunds made against it
fn render_with_refunds(props: &TransactionTableProps, row: &TransactionRow) -> Html {
    let refunds = if row.transaction_type == TransactionType::Expense {
        refunds_for(row.id, &props.refund_items)
    } else {
        Vec::new()
    };
    html! {
        <>
            {render_row(props, row, false)}
            {for refunds.into_iter().map(|refund| render_row(props, refund, true))}
        </>
    }
}

#[function_component(TransactionTable)]
pub fn transaction_table(props: &TransactionTableProps) -> Html {
    let collapsed = use_state(HashSet::<GroupKey>::new);
    let symbol = props.currency_symbol.as_str();

    if props.loading && props.rows.is_empty() {
        return html! { <div class="loading">{"Loading transactions..."}</div> };
    }
    if props.rows.is_empty() {
        return html! { <div class="empty">{"No transactions match these filters"}</div> };
    }

    let body = if props.group_by_date {
        let groups = group_by_date(&props.rows, props.offset);
        html! {
            <>{for groups.iter().map(|group| {
                let key = group.key;
                let is_collapsed = collapsed.contains(&key);
                let on_toggle = {
                    let collapsed = collapsed.clone();
                    Callback::from(move |_: MouseEvent| {
                        let mut next = (*collapsed).clone();
                        if !next.remove(&key) {
                            next.insert(key);
                        }
                        collapsed.set(next);
                    })
                };
                html! {
                    <>
                        <tr class="tx-row-group" onclick={on_toggle}>
                            <td colspan="8">
                                <span class="group-toggle">{if is_collapsed { "▸ " } else { "▾ " }}</span>
                                <strong>{key.to_string()}</strong>
                                {format!(
                                    " · {} records · income {}{} · expense {}{}",
                                    group.count(),
                                    symbol,
                                    format_cents(group.income_cents),
                                    symbol,
                                    format_cents(group.expense_cents),
                                )}
                            </td>
                        </tr>
                        {if is_collapsed {
                            html! {}
                        } else {
                            html! { <>{for group.rows.iter().map(|row| render_with_refunds(props, row))}</> }
                        }}
                    </>
                }
            })}</>
        }
    } else {
        html! { <>{for props.rows.iter().map(|row| render_with_refunds(props, row))}</> }
    };

    html! {
        <div class="table-container">
            <table class="transactions-table">
                <thead>
                    <tr>
                        <th>{"Time"}</th>
                        <th>{"Type"}</th>
                        <th>{"Amount"}</th>
                        <th>{"Category"}</th>
                        <th>{"Account"}</th>
                        <th>{"Tags"}</th>
                        <th>{"Note"}</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(transaction_type: TransactionType, funding_source: FundingSource) -> TransactionRow {
        TransactionRow {
            id: 1,
            transaction_type,
            amount_cents: 1250,
            occurred_at: "2024-01-02T10:00:00+00:00".to_string(),
            created_at: "2024-01-02T10:00:00+00:00".to_string(),
            category_id: Some(2),
            funding_source,
            bank_account_id: Some(5),
            to_bank_account_id: Some(6),
            refund_of_transaction_id: None,
            refunded_cents: None,
            note: None,
            tag_ids: vec![],
            tag_names: vec![],
        }
    }

    #[test]
    fn test_funding_text() {
        let names = HashMap::from([(5, "Bank-Daily(1234)".to_string())]);
        assert_eq!(funding_text(&row(TransactionType::Expense, FundingSource::Cash), &names), "Cash");
        assert_eq!(
            funding_text(&row(TransactionType::Expense, FundingSource::Bank), &names),
            "Bank-Daily(1234)"
        );
        assert_eq!(
            funding_text(&row(TransactionType::Transfer, FundingSource::Bank), &names),
            "Bank-Daily(1234) → Unknown account"
        );
    }

    #[test]
    fn test_category_text_falls_back_to_id() {
        let paths = HashMap::from([(2, "Food/Groceries".to_string())]);
        let mut r = row(TransactionType::Expense, FundingSource::Cash);
        assert_eq!(category_text(&r, &paths), "Food/Groceries");
        r.category_id = Some(9);
        assert_eq!(category_text(&r, &paths), "#9");
        r.category_id = None;
        assert_eq!(category_text(&r, &paths), "—");
    }
}
