use crate::components::fields::{input_checked, input_value, select_value};
use crate::hooks::use_bank_accounts;
use crate::state::{inline_or_report, notify, report_error, use_api, use_app, use_config, AppAction, NoticeLevel, Resource};
use shared::{
    format_cents, parse_amount_to_cents, AmountError, BankAccount, BankAccountKind, CreateBankAccountRequest,
    UpdateBankAccountRequest,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Opening or corrected balance; may be zero or negative (credit cards)
pub fn parse_balance(input: &str) -> Result<i64, String> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, trimmed),
    };
    if digits.is_empty() {
        return Ok(0);
    }
    let cents = match parse_amount_to_cents(digits) {
        Ok(cents) => cents,
        Err(AmountError::NotPositive) => 0,
        Err(e) => return Err(e.to_string()),
    };
    Ok(if negative { -cents } else { cents })
}

fn parse_day(input: &str, what: &str) -> Result<Option<u8>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => Ok(Some(day)),
        _ => Err(format!("{} must be a day between 1 and 31", what)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BankAccountDraft {
    /// `None` when creating
    pub editing: Option<i64>,
    pub bank_name: String,
    pub alias: String,
    pub last4: String,
    pub kind: BankAccountKind,
    pub balance: String,
    pub billing_day: String,
    pub repayment_day: String,
    pub is_active: bool,
}

impl Default for BankAccountDraft {
    fn default() -> Self {
        Self {
            editing: None,
            bank_name: String::new(),
            alias: String::new(),
            last4: String::new(),
            kind: BankAccountKind::Debit,
            balance: String::new(),
            billing_day: String::new(),
            repayment_day: String::new(),
            is_active: true,
        }
    }
}

impl BankAccountDraft {
    pub fn from_account(account: &BankAccount) -> Self {
        let day = |d: Option<u8>| d.map(|d| d.to_string()).unwrap_or_default();
        Self {
            editing: Some(account.id),
            bank_name: account.bank_name.clone(),
            alias: account.alias.clone(),
            last4: account.last4.clone().unwrap_or_default(),
            kind: account.kind,
            balance: format_cents(account.balance_cents),
            billing_day: day(account.billing_day),
            repayment_day: day(account.repayment_day),
            is_active: account.is_active,
        }
    }

    pub fn to_create_request(&self) -> Result<CreateBankAccountRequest, String> {
        let bank_name = self.bank_name.trim();
        let alias = self.alias.trim();
        if bank_name.is_empty() || alias.is_empty() {
            return Err("Bank name and alias are required".to_string());
        }
        let last4 = self.last4.trim();
        if !last4.is_empty() && (last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit())) {
            return Err("Last four digits must be exactly four digits".to_string());
        }
        let (billing_day, repayment_day) = match self.kind {
            BankAccountKind::Credit => (
                parse_day(&self.billing_day, "Billing day")?,
                parse_day(&self.repayment_day, "Repayment day")?,
            ),
            BankAccountKind::Debit => (None, None),
        };

        Ok(CreateBankAccountRequest {
            bank_name: bank_name.to_string(),
            alias: alias.to_string(),
            last4: (!last4.is_empty()).then(|| last4.to_string()),
            kind: self.kind,
            balance_cents: parse_balance(&self.balance)?,
            billing_day,
            repayment_day,
            is_active: self.is_active,
        })
    }

    pub fn to_update_request(&self) -> Result<UpdateBankAccountRequest, String> {
        let create = self.to_create_request()?;
        Ok(UpdateBankAccountRequest {
            bank_name: Some(create.bank_name),
            alias: Some(create.alias),
            last4: create.last4,
            kind: Some(create.kind),
            balance_cents: Some(create.balance_cents),
            billing_day: create.billing_day,
            repayment_day: create.repayment_day,
            is_active: Some(create.is_active),
        })
    }
}

enum SaveRequest {
    Create(CreateBankAccountRequest),
    Update(i64, UpdateBankAccountRequest),
}

#[function_component(BankAccountPage)]
pub fn bank_account_page() -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let accounts = use_bank_accounts();
    let draft = use_state(BankAccountDraft::default);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let edit = |apply: fn(&mut BankAccountDraft, String)| {
        let draft = draft.clone();
        move |value: String| {
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        }
    };
    let text_input = |apply: fn(&mut BankAccountDraft, String)| {
        let set = edit(apply);
        Callback::from(move |e: InputEvent| set(input_value(&e)))
    };

    let on_kind = {
        let set = edit(|d, v| {
            d.kind = if v == "credit" { BankAccountKind::Credit } else { BankAccountKind::Debit };
        });
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_active = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            draft.set(BankAccountDraft {
                is_active: input_checked(&e),
                ..(*draft).clone()
            });
        })
    };

    let on_submit = {
        let app = app.clone();
        let api = api.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let request = match draft.editing {
                Some(id) => draft.to_update_request().map(|r| SaveRequest::Update(id, r)),
                None => draft.to_create_request().map(SaveRequest::Create),
            };
            let request = match request {
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
                let outcome = match &request {
                    SaveRequest::Create(create) => api.create_bank_account(create).await.map(|_| "Account created"),
                    SaveRequest::Update(id, update) => {
                        api.update_bank_account(*id, update).await.map(|_| "Account updated")
                    }
                };
                match outcome {
                    Ok(message) => {
                        notify(&app, NoticeLevel::Success, message);
                        app.dispatch(AppAction::Invalidate(Resource::BankAccounts));
                        draft.set(BankAccountDraft::default());
                    }
                    Err(e) => error.set(inline_or_report(&app, "bank_account_page", &e)),
                }
                saving.set(false);
            });
        })
    };

    let toggle_active = |account: &BankAccount| {
        let app = app.clone();
        let api = api.clone();
        let id = account.id;
        let next_active = !account.is_active;
        Callback::from(move |_: MouseEvent| {
            let app = app.clone();
            let api = api.clone();
            let request = UpdateBankAccountRequest {
                is_active: Some(next_active),
                ..UpdateBankAccountRequest::default()
            };
            spawn_local(async move {
                match api.update_bank_account(id, &request).await {
                    Ok(_) => app.dispatch(AppAction::Invalidate(Resource::BankAccounts)),
                    Err(e) => report_error(&app, "bank_account_page", &e),
                }
            });
        })
    };

    let start_edit = |account: &BankAccount| {
        let draft = draft.clone();
        let error = error.clone();
        let next = BankAccountDraft::from_account(account);
        Callback::from(move |_: MouseEvent| {
            error.set(None);
            draft.set(next.clone());
        })
    };

    let symbol = config.currency_symbol.clone();
    let is_credit = draft.kind == BankAccountKind::Credit;

    html! {
        <div class="config-page bank-accounts">
            <section class="config-form">
                <h2>{if draft.editing.is_some() { "Edit account" } else { "New account" }}</h2>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}
                <form onsubmit={on_submit}>
                    <div class="form-row">
                        <div class="form-group">
                            <label>{"Bank"}</label>
                            <input type="text" value={draft.bank_name.clone()} oninput={text_input(|d, v| d.bank_name = v)} />
                        </div>
                        <div class="form-group">
                            <label>{"Alias"}</label>
                            <input type="text" value={draft.alias.clone()} oninput={text_input(|d, v| d.alias = v)} />
                        </div>
                        <div class="form-group">
                            <label>{"Last 4 digits"}</label>
                            <input type="text" maxlength="4" value={draft.last4.clone()} oninput={text_input(|d, v| d.last4 = v)} />
                        </div>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label>{"Kind"}</label>
                            <select onchange={on_kind}>
                                <option value="debit" selected={!is_credit}>{BankAccountKind::Debit.label()}</option>
                                <option value="credit" selected={is_credit}>{BankAccountKind::Credit.label()}</option>
                            </select>
                        </div>
                        <div class="form-group">
                            <label>{"Balance"}</label>
                            <input type="text" inputmode="decimal" placeholder="0.00" value={draft.balance.clone()} oninput={text_input(|d, v| d.balance = v)} />
                        </div>
                        {if is_credit {
                            html! {
                                <>
                                    <div class="form-group">
                                        <label>{"Billing day"}</label>
                                        <input type="number" min="1" max="31" value={draft.billing_day.clone()} oninput={text_input(|d, v| d.billing_day = v)} />
                                    </div>
                                    <div class="form-group">
                                        <label>{"Repayment day"}</label>
                                        <input type="number" min="1" max="31" value={draft.repayment_day.clone()} oninput={text_input(|d, v| d.repayment_day = v)} />
                                    </div>
                                </>
                            }
                        } else { html! {} }}
                    </div>
                    <label class="checkbox">
                        <input type="checkbox" checked={draft.is_active} onchange={on_active} />
                        {"Active"}
                    </label>
                    <div class="button-row">
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            {if *saving { "Saving..." } else { "Save" }}
                        </button>
                        {if draft.editing.is_some() {
                            let draft = draft.clone();
                            html! {
                                <button type="button" class="btn btn-secondary" onclick={Callback::from(move |_: MouseEvent| draft.set(BankAccountDraft::default()))}>
                                    {"Cancel"}
                                </button>
                            }
                        } else { html! {} }}
                    </div>
                </form>
            </section>
            <section class="config-list">
                <h2>{"Accounts"}</h2>
                {if accounts.loading && accounts.accounts.is_empty() {
                    html! { <div class="loading">{"Loading accounts..."}</div> }
                } else if accounts.accounts.is_empty() {
                    html! { <div class="empty">{"No bank accounts yet"}</div> }
                } else {
                    html! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>{"Account"}</th>
                                    <th>{"Kind"}</th>
                                    <th>{"Balance"}</th>
                                    <th>{"Billing / repayment"}</th>
                                    <th>{"Status"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for accounts.accounts.iter().map(|account| html! {
                                    <tr class={classes!((!account.is_active).then_some("inactive"))}>
                                        <td>{account.display_name()}</td>
                                        <td>{account.kind.label()}</td>
                                        <td class="amount">{format!("{}{}", symbol, format_cents(account.balance_cents))}</td>
                                        <td>
                                            {match (account.billing_day, account.repayment_day) {
                                                (None, None) => String::new(),
                                                (billing, repayment) => format!(
                                                    "{} / {}",
                                                    billing.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                                                    repayment.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                                                ),
                                            }}
                                        </td>
                                        <td>{if account.is_active { "Active" } else { "Inactive" }}</td>
                                        <td class="actions">
                                            <button class="btn btn-link" onclick={start_edit(account)}>{"Edit"}</button>
                                            <button class="btn btn-link" onclick={toggle_active(account)}>
                                                {if account.is_active { "Deactivate" } else { "Activate" }}
                                            </button>
                                        </td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                    }
                }}
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_accepts_zero_and_negative() {
        assert_eq!(parse_balance(""), Ok(0));
        assert_eq!(parse_balance("0.00"), Ok(0));
        assert_eq!(parse_balance("-1,200.50"), Ok(-120_050));
        assert_eq!(parse_balance("88"), Ok(8800));
        assert!(parse_balance("abc").is_err());
    }

    #[test]
    fn test_debit_accounts_drop_card_days() {
        let draft = BankAccountDraft {
            bank_name: " City Bank ".to_string(),
            alias: "Salary".to_string(),
            last4: "1234".to_string(),
            billing_day: "5".to_string(),
            ..BankAccountDraft::default()
        };
        let request = draft.to_create_request().unwrap();
        assert_eq!(request.bank_name, "City Bank");
        assert_eq!(request.last4.as_deref(), Some("1234"));
        assert_eq!(request.billing_day, None);
        assert_eq!(request.balance_cents, 0);
    }

    #[test]
    fn test_credit_account_validates_days_and_last4() {
        let draft = BankAccountDraft {
            bank_name: "Card Co".to_string(),
            alias: "Travel".to_string(),
            kind: BankAccountKind::Credit,
            billing_day: "5".to_string(),
            repayment_day: "25".to_string(),
            ..BankAccountDraft::default()
        };
        let request = draft.to_create_request().unwrap();
        assert_eq!(request.billing_day, Some(5));
        assert_eq!(request.repayment_day, Some(25));

        let bad_day = BankAccountDraft {
            repayment_day: "32".to_string(),
            ..draft.clone()
        };
        assert!(bad_day.to_create_request().is_err());

        let bad_last4 = BankAccountDraft {
            last4: "12a4".to_string(),
            ..draft
        };
        assert!(bad_last4.to_create_request().is_err());
    }

    #[test]
    fn test_update_request_round_trips_account() {
        let account = BankAccount {
            id: 9,
            bank_name: "City Bank".to_string(),
            alias: "Salary".to_string(),
            last4: None,
            kind: BankAccountKind::Debit,
            balance_cents: -2_500,
            billing_day: None,
            repayment_day: None,
            is_active: false,
        };
        let draft = BankAccountDraft::from_account(&account);
        assert_eq!(draft.editing, Some(9));
        let update = draft.to_update_request().unwrap();
        assert_eq!(update.balance_cents, Some(-2_500));
        assert_eq!(update.is_active, Some(false));
        assert_eq!(update.last4, None);
    }
}
