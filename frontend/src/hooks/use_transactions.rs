use super::FetchGuard;
use crate::services::Logger;
use crate::state::{report_error, use_api, use_app, Resource};
use shared::query::TransactionListQuery;
use shared::TransactionPage;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub struct TransactionsState {
    pub page: TransactionPage,
    pub loading: bool,
}

/// One server page of the transaction list for `query`
#[hook]
pub fn use_transactions(query: TransactionListQuery) -> UseStateHandle<TransactionsState> {
    let app = use_app();
    let api = use_api();
    let state = use_state(TransactionsState::default);
    let generation = app.generation(Resource::Transactions);

    use_effect_with((query, generation), {
        let state = state.clone();
        let app = app.clone();

        move |(query, _)| {
            let query = query.clone();
            let guard = FetchGuard::new();
            state.set(TransactionsState {
                page: state.page.clone(),
                loading: true,
            });

            let in_flight = guard.clone();
            spawn_local(async move {
                let result = api.transactions(&query).await;
                if !in_flight.is_current() {
                    Logger::debug_with_component("use_transactions", "dropped stale page");
                    return;
                }
                match result {
                    Ok(page) => {
                        if page.client_totals_agree() == Some(false) {
                            Logger::warn_with_component(
                                "use_transactions",
                                "server totals disagree with the rows on a complete page",
                            );
                        }
                        state.set(TransactionsState { page, loading: false });
                    }
                    Err(e) => {
                        report_error(&app, "use_transactions", &e);
                        state.set(TransactionsState::default());
                    }
                }
            });

            guard.canceller()
        }
    });

    state
}
