use super::forms::{EntryForm, TransferForm};
use super::transactions::TransactionList;
use shared::TransactionType;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryTab {
    Expense,
    Income,
    Transfer,
}

impl EntryTab {
    const ALL: [EntryTab; 3] = [EntryTab::Expense, EntryTab::Income, EntryTab::Transfer];

    fn label(&self) -> &'static str {
        match self {
            EntryTab::Expense => "Expense",
            EntryTab::Income => "Income",
            EntryTab::Transfer => "Transfer",
        }
    }
}

/// Entry forms above the transaction list
#[function_component(LedgerPage)]
pub fn ledger_page() -> Html {
    let tab = use_state(|| EntryTab::Expense);

    let form = match *tab {
        EntryTab::Expense => html! { <EntryForm key="expense" transaction_type={TransactionType::Expense} /> },
        EntryTab::Income => html! { <EntryForm key="income" transaction_type={TransactionType::Income} /> },
        EntryTab::Transfer => html! { <TransferForm /> },
    };

    html! {
        <div class="ledger-page">
            <div class="entry-tabs">
                {for EntryTab::ALL.into_iter().map(|t| {
                    let onclick = {
                        let tab = tab.clone();
                        Callback::from(move |_: MouseEvent| tab.set(t))
                    };
                    html! {
                        <button class={classes!("tab", (*tab == t).then_some("active"))} onclick={onclick}>
                            {t.label()}
                        </button>
                    }
                })}
            </div>
            {form}
            <TransactionList />
        </div>
    }
}
