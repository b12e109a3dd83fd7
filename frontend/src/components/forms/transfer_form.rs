use crate::components::fields::{check_note_length, input_value, optional_text, parse_id, select_value, textarea_value};
use crate::hooks::use_bank_accounts;
use crate::services::date_utils::{input_to_rfc3339, local_offset, now_input_value};
use crate::state::{inline_or_report, notify, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use chrono::FixedOffset;
use shared::{parse_amount_to_cents, CreateTransferRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Money moved between two of the user's bank accounts
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDraft {
    pub from_account: Option<i64>,
    pub to_account: Option<i64>,
    pub amount: String,
    pub occurred_at: String,
    pub note: String,
}

impl Default for TransferDraft {
    fn default() -> Self {
        Self {
            from_account: None,
            to_account: None,
            amount: String::new(),
            occurred_at: now_input_value(),
            note: String::new(),
        }
    }
}

impl TransferDraft {
    pub fn to_request(&self, offset: FixedOffset, max_note_length: usize) -> Result<CreateTransferRequest, String> {
        let (Some(from), Some(to)) = (self.from_account, self.to_account) else {
            return Err("Please choose both accounts".to_string());
        };
        if from == to {
            return Err("Choose two different accounts".to_string());
        }
        let amount_cents = parse_amount_to_cents(&self.amount).map_err(|e| e.to_string())?;
        let occurred_at = input_to_rfc3339(&self.occurred_at, offset)
            .ok_or_else(|| "Please enter a valid time".to_string())?;
        check_note_length(&self.note, max_note_length)?;

        Ok(CreateTransferRequest {
            from_bank_account_id: from,
            to_bank_account_id: to,
            amount_cents,
            occurred_at,
            note: optional_text(&self.note),
        })
    }
}

#[function_component(TransferForm)]
pub fn transfer_form() -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let bank_accounts = use_bank_accounts();
    let draft = use_state(TransferDraft::default);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let edit = |apply: fn(&mut TransferDraft, String)| {
        let draft = draft.clone();
        move |value: String| {
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        }
    };

    let on_from = {
        let set = edit(|d, v| d.from_account = parse_id(&v));
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_to = {
        let set = edit(|d, v| d.to_account = parse_id(&v));
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
        let max_note = config.max_note_length;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let request = match draft.to_request(local_offset(), max_note) {
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
                match api.create_transfer(&request).await {
                    Ok(row) => {
                        notify(&app, NoticeLevel::Success, "Transfer recorded");
                        app.dispatch(AppAction::FlashTransaction(row.id));
                        for resource in [Resource::Transactions, Resource::BankAccounts, Resource::Stats] {
                            app.dispatch(AppAction::Invalidate(resource));
                        }
                        draft.set(TransferDraft {
                            amount: String::new(),
                            note: String::new(),
                            ..(*draft).clone()
                        });
                    }
                    Err(e) => error.set(inline_or_report(&app, "transfer_form", &e)),
                }
                saving.set(false);
            });
        })
    };

    let account_options = |selected: Option<i64>| {
        html! {
            <>
                <option value="" selected={selected.is_none()}>{"Choose an account"}</option>
                {for bank_accounts.active().map(|account| html! {
                    <option value={account.id.to_string()} selected={selected == Some(account.id)}>
                        {account.display_name()}
                    </option>
                })}
            </>
        }
    };

    html! {
        <section class="entry-form transfer">
            <h2>{"Record transfer"}</h2>
            {if let Some(message) = error.as_ref() {
                html! { <div class="form-message error">{message}</div> }
            } else { html! {} }}
            <form onsubmit={on_submit}>
                <div class="form-row">
                    <div class="form-group">
                        <label>{"From"}</label>
                        <select onchange={on_from}>{account_options(draft.from_account)}</select>
                    </div>
                    <div class="form-group">
                        <label>{"To"}</label>
                        <select onchange={on_to}>{account_options(draft.to_account)}</select>
                    </div>
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
                    {if *saving { "Saving..." } else { "Transfer" }}
                </button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(from: Option<i64>, to: Option<i64>) -> TransferDraft {
        TransferDraft {
            from_account: from,
            to_account: to,
            amount: "100".to_string(),
            occurred_at: "2024-05-04T09:00".to_string(),
            note: "rent".to_string(),
        }
    }

    #[test]
    fn test_transfer_needs_two_distinct_accounts() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(draft(Some(1), None).to_request(offset, 100).is_err());
        assert!(draft(Some(1), Some(1)).to_request(offset, 100).is_err());

        let request = draft(Some(1), Some(2)).to_request(offset, 100).unwrap();
        assert_eq!(request.from_bank_account_id, 1);
        assert_eq!(request.to_bank_account_id, 2);
        assert_eq!(request.amount_cents, 10_000);
        assert_eq!(request.note.as_deref(), Some("rent"));
    }
}
