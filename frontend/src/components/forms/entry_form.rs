use crate::components::category_leaf_select::CategoryLeafSelect;
use crate::components::fields::{check_note_length, input_value, optional_text, parse_id, select_value, textarea_value};
use crate::components::tag_picker::{toggle_tag, TagPicker};
use crate::hooks::{use_bank_accounts, use_category_tags, use_category_tree};
use crate::services::date_utils::{input_to_rfc3339, local_offset, now_input_value};
use crate::services::Logger;
use crate::state::{inline_or_report, notify, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use chrono::FixedOffset;
use shared::{
    parse_amount_to_cents, CategoryForest, CategoryType, CreateTransactionRequest, FundingSource,
    TransactionType,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// What the user has typed into an income or expense form
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub category_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub funding: FundingSource,
    pub bank_account_id: Option<i64>,
    pub amount: String,
    pub occurred_at: String,
    pub note: String,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            category_id: None,
            tag_ids: Vec::new(),
            funding: FundingSource::Cash,
            bank_account_id: None,
            amount: String::new(),
            occurred_at: now_input_value(),
            note: String::new(),
        }
    }
}

impl EntryDraft {
    /// Keeps category and funding for the next entry
    pub fn after_submit(&self) -> Self {
        Self {
            amount: String::new(),
            note: String::new(),
            occurred_at: now_input_value(),
            ..self.clone()
        }
    }

    pub fn to_request(
        &self,
        transaction_type: TransactionType,
        forest: &CategoryForest,
        offset: FixedOffset,
        max_note_length: usize,
    ) -> Result<CreateTransactionRequest, String> {
        let category_id = self
            .category_id
            .ok_or_else(|| "Please choose a category".to_string())?;
        match forest.find_node(category_id) {
            Some(node) if node.is_leaf() && node.is_active => {}
            _ => return Err("Only active leaf categories can be used".to_string()),
        }
        let amount_cents = parse_amount_to_cents(&self.amount).map_err(|e| e.to_string())?;
        let occurred_at = input_to_rfc3339(&self.occurred_at, offset)
            .ok_or_else(|| "Please enter a valid time".to_string())?;
        check_note_length(&self.note, max_note_length)?;

        let bank_account_id = match self.funding {
            FundingSource::Cash => None,
            FundingSource::Bank => Some(
                self.bank_account_id
                    .ok_or_else(|| "Please choose a bank account".to_string())?,
            ),
        };
        let tag_ids = if transaction_type == TransactionType::Expense {
            self.tag_ids.clone()
        } else {
            Vec::new()
        };

        Ok(CreateTransactionRequest {
            transaction_type,
            amount_cents,
            occurred_at,
            category_id,
            funding_source: self.funding,
            bank_account_id,
            tag_ids,
            note: optional_text(&self.note),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct EntryFormProps {
    /// `Expense` or `Income`
    pub transaction_type: TransactionType,
}

#[function_component(EntryForm)]
pub fn entry_form(props: &EntryFormProps) -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let transaction_type = props.transaction_type;
    let is_expense = transaction_type == TransactionType::Expense;
    let category_type = transaction_type
        .category_type()
        .unwrap_or(CategoryType::Expense);

    let tree = use_category_tree(category_type);
    let bank_accounts = use_bank_accounts();
    let draft = use_state(EntryDraft::default);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let top_level = draft
        .category_id
        .and_then(|id| tree.forest.top_level_ancestor(id));
    let tags = use_category_tags(if is_expense { top_level } else { None });

    let edit = |apply: fn(&mut EntryDraft, String)| {
        let draft = draft.clone();
        move |value: String| {
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        }
    };

    let on_category = {
        let draft = draft.clone();
        let forest = tree.forest.clone();
        Callback::from(move |category_id: Option<i64>| {
            let mut next = (*draft).clone();
            let old_top = next.category_id.and_then(|id| forest.top_level_ancestor(id));
            let new_top = category_id.and_then(|id| forest.top_level_ancestor(id));
            if old_top != new_top {
                next.tag_ids.clear();
            }
            next.category_id = category_id;
            draft.set(next);
        })
    };

    let on_toggle_tag = {
        let draft = draft.clone();
        Callback::from(move |tag_id: i64| {
            draft.set(EntryDraft {
                tag_ids: toggle_tag(&draft.tag_ids, tag_id),
                ..(*draft).clone()
            });
        })
    };

    let on_funding = {
        let set = edit(|d, v| {
            d.funding = if v == "bank" { FundingSource::Bank } else { FundingSource::Cash };
            if d.funding == FundingSource::Cash {
                d.bank_account_id = None;
            }
        });
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_bank = {
        let set = edit(|d, v| d.bank_account_id = parse_id(&v));
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_amount = {
        let set = edit(|d, v| d.amount = v);
        Callback::from(move |e: InputEvent| set(input_value(&e)))
    };
    let on_time = {
        let set = edit(|d, v| d.occurred_at = v);
        Callback::from(move |e: InputEvent| set(input_value(&e)))
    };
    let on_note = {
        let set = edit(|d, v| d.note = v);
        Callback::from(move |e: InputEvent| set(textarea_value(&e)))
    };

    let on_submit = {
        let app = app.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();
        let forest = tree.forest.clone();
        let max_note = config.max_note_length;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let request = match draft.to_request(transaction_type, &forest, local_offset(), max_note) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            saving.set(true);
            error.set(None);
            let app = app.clone();
            let api = api.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let error = error.clone();
            spawn_local(async move {
                match api.create_transaction(&request).await {
                    Ok(row) => {
                        Logger::info_with_component(
                            "entry_form",
                            &format!("created {} {}", transaction_type.as_str(), row.id),
                        );
                        notify(&app, NoticeLevel::Success, format!("{} recorded", transaction_type.label()));
                        app.dispatch(AppAction::FlashTransaction(row.id));
                        for resource in [Resource::Transactions, Resource::BankAccounts, Resource::Stats] {
                            app.dispatch(AppAction::Invalidate(resource));
                        }
                        draft.set(draft.after_submit());
                    }
                    Err(e) => error.set(inline_or_report(&app, "entry_form", &e)),
                }
                saving.set(false);
            });
        })
    };

    let title = if is_expense { "Record expense" } else { "Record income" };

    html! {
        <section class={classes!("entry-form", transaction_type.as_str())}>
            <h2>{title}</h2>
            {if let Some(message) = error.as_ref() {
                html! { <div class="form-message error">{message}</div> }
            } else { html! {} }}
            <form onsubmit={on_submit}>
                <div class="form-group">
                    <label>{"Category"}</label>
                    <CategoryLeafSelect
                        forest={tree.forest.clone()}
                        value={draft.category_id}
                        onchange={on_category}
                        disabled={tree.loading}
                    />
                </div>
                {if is_expense {
                    html! {
                        <div class="form-group">
                            <label>{"Tags"}</label>
                            <TagPicker
                                tags={tags.active().cloned().collect::<Vec<_>>()}
                                selected={draft.tag_ids.clone()}
                                loading={tags.loading}
                                on_toggle={on_toggle_tag}
                            />
                        </div>
                    }
                } else { html! {} }}
                <div class="form-row">
                    <div class="form-group">
                        <label>{"Funding"}</label>
                        <select onchange={on_funding}>
                            <option value="cash" selected={draft.funding == FundingSource::Cash}>
                                {FundingSource::Cash.label()}
                            </option>
                            <option value="bank" selected={draft.funding == FundingSource::Bank}>
                                {FundingSource::Bank.label()}
                            </option>
                        </select>
                    </div>
                    {if draft.funding == FundingSource::Bank {
                        html! {
                            <div class="form-group">
                                <label>{"Account"}</label>
                                <select onchange={on_bank}>
                                    <option value="" selected={draft.bank_account_id.is_none()}>{"Choose an account"}</option>
                                    {for bank_accounts.active().map(|account| html! {
                                        <option
                                            value={account.id.to_string()}
                                            selected={draft.bank_account_id == Some(account.id)}
                                        >
                                            {account.display_name()}
                                        </option>
                                    })}
                                </select>
                            </div>
                        }
                    } else { html! {} }}
                </div>
                <div class="form-row">
                    <div class="form-group">
                        <label>{"Amount"}</label>
                        <input
                            type="text"
                            inputmode="decimal"
                            placeholder="0.00"
                            value={draft.amount.clone()}
                            oninput={on_amount}
                        />
                    </div>
                    <div class="form-group">
                        <label>{"Time"}</label>
                        <input type="datetime-local" value={draft.occurred_at.clone()} oninput={on_time} />
                    </div>
                </div>
                <div class="form-group">
                    <label>{"Note"}</label>
                    <textarea rows="2" value={draft.note.clone()} oninput={on_note} />
                </div>
                <button type="submit" class="btn btn-primary" disabled={*saving}>
                    {if *saving { "Saving..." } else { "Save" }}
                </button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CategoryNode;

    fn plus8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn node(id: i64, name: &str, is_active: bool, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            id,
            category_type: CategoryType::Expense,
            name: name.to_string(),
            parent_id: None,
            sort_order: 0,
            is_active,
            is_leaf: children.is_empty(),
            children,
        }
    }

    /// Food(1) [Lunch(2), Old(3, inactive)]
    fn forest() -> CategoryForest {
        CategoryForest::from_snapshot(&[node(
            1,
            "Food",
            true,
            vec![node(2, "Lunch", true, vec![]), node(3, "Old", false, vec![])],
        )])
        .unwrap()
    }

    fn draft(category_id: i64) -> EntryDraft {
        EntryDraft {
            category_id: Some(category_id),
            tag_ids: vec![7],
            funding: FundingSource::Cash,
            bank_account_id: Some(4),
            amount: "12.30".to_string(),
            occurred_at: "2024-03-01T08:15".to_string(),
            note: "  ".to_string(),
        }
    }

    #[test]
    fn test_expense_request_from_cash_draft() {
        let request = draft(2)
            .to_request(TransactionType::Expense, &forest(), plus8(), 100)
            .unwrap();
        assert_eq!(request.amount_cents, 1230);
        assert_eq!(request.category_id, 2);
        assert_eq!(request.occurred_at, "2024-03-01T08:15:00+08:00");
        assert_eq!(request.bank_account_id, None);
        assert_eq!(request.tag_ids, vec![7]);
        assert_eq!(request.note, None);
    }

    #[test]
    fn test_income_request_drops_tags() {
        let request = draft(2)
            .to_request(TransactionType::Income, &forest(), plus8(), 100)
            .unwrap();
        assert!(request.tag_ids.is_empty());
    }

    #[test]
    fn test_only_active_leaves_are_accepted() {
        let forest = forest();
        assert!(draft(1).to_request(TransactionType::Expense, &forest, plus8(), 100).is_err());
        assert!(draft(3).to_request(TransactionType::Expense, &forest, plus8(), 100).is_err());
        let no_category = EntryDraft {
            category_id: None,
            ..draft(2)
        };
        assert!(no_category.to_request(TransactionType::Expense, &forest, plus8(), 100).is_err());
    }

    #[test]
    fn test_bank_funding_requires_an_account() {
        let forest = forest();
        let bank = EntryDraft {
            funding: FundingSource::Bank,
            bank_account_id: None,
            ..draft(2)
        };
        assert!(bank.to_request(TransactionType::Expense, &forest, plus8(), 100).is_err());

        let bank = EntryDraft {
            bank_account_id: Some(4),
            ..bank
        };
        let request = bank.to_request(TransactionType::Expense, &forest, plus8(), 100).unwrap();
        assert_eq!(request.funding_source, FundingSource::Bank);
        assert_eq!(request.bank_account_id, Some(4));
    }

    #[test]
    fn test_bad_amount_is_reported() {
        let bad = EntryDraft {
            amount: "1.234".to_string(),
            ..draft(2)
        };
        assert!(bad.to_request(TransactionType::Expense, &forest(), plus8(), 100).is_err());
    }
}
