use super::FetchGuard;
use crate::state::{report_error, use_api, use_app, Resource};
use shared::BankAccount;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub struct BankAccountsState {
    /// Most used first
    pub accounts: Vec<BankAccount>,
    pub loading: bool,
}

impl BankAccountsState {
    pub fn active(&self) -> impl Iterator<Item = &BankAccount> {
        self.accounts.iter().filter(|a| a.is_active)
    }
}

#[hook]
pub fn use_bank_accounts() -> UseStateHandle<BankAccountsState> {
    let app = use_app();
    let api = use_api();
    let state = use_state(BankAccountsState::default);
    let generation = app.generation(Resource::BankAccounts);

    use_effect_with(generation, {
        let state = state.clone();
        let app = app.clone();

        move |_| {
            let guard = FetchGuard::new();
            state.set(BankAccountsState {
                accounts: state.accounts.clone(),
                loading: true,
            });
            let in_flight = guard.clone();
            spawn_local(async move {
                let result = api.bank_accounts().await;
                if !in_flight.is_current() {
                    return;
                }
                match result {
                    Ok(accounts) => state.set(BankAccountsState {
                        accounts,
                        loading: false,
                    }),
                    Err(e) => {
                        report_error(&app, "use_bank_accounts", &e);
                        state.set(BankAccountsState::default());
                    }
                }
            });

            guard.canceller()
        }
    });

    state
}
