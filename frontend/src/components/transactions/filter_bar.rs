use crate::components::fields::{input_value, parse_id, select_value};
use shared::query::{FundingFilter, TypeFilter};
use shared::{BankAccount, DatePreset};
use yew::prelude::*;

/// Filters chosen in the bar, applied to the list query
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilters {
    pub type_filter: TypeFilter,
    pub funding: FundingFilter,
    pub bank_account_id: Option<i64>,
    /// `None` means all time
    pub preset: Option<DatePreset>,
    pub keyword: String,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            type_filter: TypeFilter::All,
            funding: FundingFilter::All,
            bank_account_id: None,
            preset: Some(DatePreset::ThisMonth),
            keyword: String::new(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub filters: ListFilters,
    pub bank_accounts: Vec<BankAccount>,
    pub onchange: Callback<ListFilters>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let keyword = use_state(|| props.filters.keyword.clone());
    let filters = props.filters.clone();

    let update = |apply: fn(&mut ListFilters, String)| {
        let onchange = props.onchange.clone();
        let filters = filters.clone();
        Callback::from(move |e: Event| {
            let mut next = filters.clone();
            apply(&mut next, select_value(&e));
            onchange.emit(next);
        })
    };

    let on_search = {
        let onchange = props.onchange.clone();
        let filters = filters.clone();
        let keyword = keyword.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            onchange.emit(ListFilters {
                keyword: (*keyword).clone(),
                ..filters.clone()
            });
        })
    };

    html! {
        <form class="filter-bar" onsubmit={on_search}>
            <select onchange={update(|f, v| f.type_filter = TypeFilter::from_key(&v))}>
                {for TypeFilter::ALL.iter().map(|t| html! {
                    <option value={t.key()} selected={*t == filters.type_filter}>{t.label()}</option>
                })}
            </select>
            <select onchange={update(|f, v| {
                f.funding = FundingFilter::from_key(&v);
                if f.funding != FundingFilter::Bank {
                    f.bank_account_id = None;
                }
            })}>
                {for FundingFilter::ALL.iter().map(|s| html! {
                    <option value={s.key()} selected={*s == filters.funding}>{s.label()}</option>
                })}
            </select>
            {if filters.funding == FundingFilter::Bank {
                html! {
                    <select onchange={update(|f, v| f.bank_account_id = parse_id(&v))}>
                        <option value="" selected={filters.bank_account_id.is_none()}>{"All accounts"}</option>
                        {for props.bank_accounts.iter().map(|a| html! {
                            <option value={a.id.to_string()} selected={filters.bank_account_id == Some(a.id)}>
                                {a.display_name()}
                            </option>
                        })}
                    </select>
                }
            } else { html! {} }}
            <select onchange={update(|f, v| f.preset = DatePreset::from_key(&v))}>
                <option value="all" selected={filters.preset.is_none()}>{"All time"}</option>
                {for DatePreset::ALL.iter().map(|p| html! {
                    <option value={p.key()} selected={filters.preset == Some(*p)}>{p.label()}</option>
                })}
            </select>
            <input
                type="search"
                placeholder="Search notes, categories, tags"
                value={(*keyword).clone()}
                oninput={let keyword = keyword.clone(); Callback::from(move |e: InputEvent| keyword.set(input_value(&e)))}
            />
            <button type="submit" class="btn btn-secondary">{"Search"}</button>
        </form>
    }
}
