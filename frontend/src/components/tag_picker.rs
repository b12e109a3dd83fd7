use shared::CategoryTag;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TagPickerProps {
    pub tags: Vec<CategoryTag>,
    pub selected: Vec<i64>,
    pub on_toggle: Callback<i64>,
    #[prop_or_default]
    pub loading: bool,
}

/// Toggle a tag id in `selected`
pub fn toggle_tag(selected: &[i64], tag_id: i64) -> Vec<i64> {
    if selected.contains(&tag_id) {
        selected.iter().copied().filter(|id| *id != tag_id).collect()
    } else {
        let mut next = selected.to_vec();
        next.push(tag_id);
        next
    }
}

#[function_component(TagPicker)]
pub fn tag_picker(props: &TagPickerProps) -> Html {
    if props.loading {
        return html! { <div class="tag-picker loading">{"Loading tags..."}</div> };
    }
    if props.tags.is_empty() {
        return html! { <div class="tag-picker empty">{"No tags for this category"}</div> };
    }

    html! {
        <div class="tag-picker">
            {for props.tags.iter().map(|tag| {
                let checked = props.selected.contains(&tag.id);
                let onclick = {
                    let on_toggle = props.on_toggle.clone();
                    let id = tag.id;
                    Callback::from(move |_: MouseEvent| on_toggle.emit(id))
                };
                html! {
                    <button
                        type="button"
                        class={classes!("tag-chip", checked.then_some("selected"), (!tag.is_active).then_some("inactive"))}
                        {onclick}
                    >
                        {&tag.name}
                    </button>
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_tag() {
        assert_eq!(toggle_tag(&[1, 2], 3), vec![1, 2, 3]);
        assert_eq!(toggle_tag(&[1, 2, 3], 2), vec![1, 3]);
        assert_eq!(toggle_tag(&[], 5), vec![5]);
    }
}
