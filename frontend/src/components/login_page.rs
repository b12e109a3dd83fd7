use super::fields::input_value;
use crate::hooks::use_session::SessionActions;
use shared::{ApiError, LoginRequest};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub session: SessionActions,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let login = props.session.login.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            if username.trim().is_empty() || password.is_empty() {
                error.set(Some("Please enter a username and password".to_string()));
                return;
            }

            submitting.set(true);
            error.set(None);

            let on_failure = {
                let submitting = submitting.clone();
                let error = error.clone();
                Callback::from(move |e: ApiError| {
                    let message = match e {
                        ApiError::Unauthorized => "Wrong username or password".to_string(),
                        other => other.user_message(),
                    };
                    error.set(Some(message));
                    submitting.set(false);
                })
            };
            login.emit((
                LoginRequest {
                    username: username.trim().to_string(),
                    password: (*password).clone(),
                },
                on_failure,
            ));
        })
    };

    html! {
        <section class="login-page">
            <h2>{"Sign in"}</h2>
            {if let Some(message) = error.as_ref() {
                html! { <div class="form-message error">{message}</div> }
            } else { html! {} }}
            <form class="login-form" {onsubmit}>
                <div class="form-group">
                    <label for="login-username">{"Username"}</label>
                    <input
                        id="login-username"
                        type="text"
                        autocomplete="username"
                        value={(*username).clone()}
                        oninput={let username = username.clone(); Callback::from(move |e: InputEvent| username.set(input_value(&e)))}
                        disabled={*submitting}
                    />
                </div>
                <div class="form-group">
                    <label for="login-password">{"Password"}</label>
                    <input
                        id="login-password"
                        type="password"
                        autocomplete="current-password"
                        value={(*password).clone()}
                        oninput={let password = password.clone(); Callback::from(move |e: InputEvent| password.set(input_value(&e)))}
                        disabled={*submitting}
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </section>
    }
}
