use super::fields::{parse_id, select_value};
use shared::CategoryForest;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CategoryLeafSelectProps {
    pub forest: Rc<CategoryForest>,
    pub value: Option<i64>,
    pub onchange: Callback<Option<i64>>,
    #[prop_or_default]
    pub id: Option<AttrValue>,
    #[prop_or_default]
    pub disabled: bool,
}

/// Picker over the whole tree where only active leaves can be chosen
#[function_component(CategoryLeafSelect)]
pub fn category_leaf_select(props: &CategoryLeafSelectProps) -> Html {
    let onchange = props
        .onchange
        .reform(|e: Event| parse_id(&select_value(&e)));
    let selected = props.value;

    html! {
        <select class="category-leaf-select" id={props.id.clone()} {onchange} disabled={props.disabled}>
            <option value="" selected={selected.is_none()}>{"Choose a category"}</option>
            {for props.forest.leaf_options().into_iter().map(|option| {
                let indent = "\u{00a0}\u{00a0}".repeat(option.depth);
                html! {
                    <option
                        value={option.id.to_string()}
                        disabled={!option.selectable}
                        selected={selected == Some(option.id)}
                    >
                        {format!("{}{}", indent, option.label)}
                    </option>
                }
            })}
        </select>
    }
}
