use crate::state::{use_app, AppAction, Section};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let app = use_app();

    let username = app
        .user
        .as_ref()
        .map(|u| format!("{} ({})", u.username, u.role.label()))
        .unwrap_or_default();

    html! {
        <header class="header">
            <div class="container">
                <h1>{"Household Books"}</h1>
                <nav class="section-nav">
                    {for Section::ALL.iter().copied().filter(|s| app.can_open(*s)).map(|section| {
                        let is_active = app.section == section;
                        let onclick = {
                            let app = app.clone();
                            Callback::from(move |_: MouseEvent| app.dispatch(AppAction::Navigate(section)))
                        };
                        html! {
                            <button
                                class={classes!("nav-button", is_active.then_some("active"))}
                                {onclick}
                            >
                                {section.label()}
                            </button>
                        }
                    })}
                </nav>
                <div class="header-right">
                    <span class="current-user">{username}</span>
                    <button
                        class="btn btn-secondary"
                        onclick={props.on_logout.reform(|_: MouseEvent| ())}
                    >
                        {"Sign out"}
                    </button>
                </div>
            </div>
        </header>
    }
}
