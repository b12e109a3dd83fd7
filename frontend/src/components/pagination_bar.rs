use super::fields::select_value;
use shared::pagination::{indicators, page_count, page_of_index, PageIndicator};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationBarProps {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub page_size_options: Vec<u64>,
    #[prop_or(5)]
    pub max_pages: u64,
    /// `(page, page_size)`
    pub onchange: Callback<(u64, u64)>,
}

/// Page that keeps the first visible row on screen after a page size change
pub fn page_after_resize(page: u64, old_size: u64, new_size: u64) -> u64 {
    let first_row = page.saturating_sub(1) * old_size;
    page_of_index(first_row as usize, new_size)
}

#[function_component(PaginationBar)]
pub fn pagination_bar(props: &PaginationBarProps) -> Html {
    let total_pages = page_count(props.total, props.page_size);
    let page_size = props.page_size;

    let go = |page: u64| {
        let onchange = props.onchange.clone();
        Callback::from(move |_: MouseEvent| onchange.emit((page, page_size)))
    };

    let on_size_change = {
        let onchange = props.onchange.clone();
        let page = props.page;
        Callback::from(move |e: Event| {
            if let Ok(new_size) = select_value(&e).parse::<u64>() {
                onchange.emit((page_after_resize(page, page_size, new_size), new_size));
            }
        })
    };

    html! {
        <nav class="pagination">
            <span class="pagination-total">{format!("{} records", props.total)}</span>
            {for indicators(props.page, total_pages, props.max_pages).into_iter().map(|indicator| match indicator {
                PageIndicator::Page(page) => html! {
                    <button class="page-link" onclick={go(page)}>{page}</button>
                },
                PageIndicator::CurrPage(page) => html! {
                    <button class="page-link current" disabled=true>{page}</button>
                },
                PageIndicator::Ellipsis => html! { <span class="page-ellipsis">{"…"}</span> },
                PageIndicator::Back(page) => html! {
                    <button class="page-link" onclick={go(page)}>{"‹ Prev"}</button>
                },
                PageIndicator::Next(page) => html! {
                    <button class="page-link" onclick={go(page)}>{"Next ›"}</button>
                },
            })}
            <select class="page-size" onchange={on_size_change}>
                {for props.page_size_options.iter().map(|size| html! {
                    <option value={size.to_string()} selected={*size == page_size}>
                        {format!("{} / page", size)}
                    </option>
                })}
            </select>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_after_resize_keeps_first_row() {
        // rows 100..149 on page 3 of 50
        assert_eq!(page_after_resize(3, 50, 20), 6);
        assert_eq!(page_after_resize(3, 50, 200), 1);
        assert_eq!(page_after_resize(1, 50, 100), 1);
    }
}
