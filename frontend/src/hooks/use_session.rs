use crate::services::{ApiClient, Logger};
use crate::state::{use_app, use_config, AppAction, Resource};
use shared::{ApiError, LoginRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct SessionActions {
    /// Credentials plus a callback for a failed attempt
    pub login: Callback<(LoginRequest, Callback<ApiError>)>,
    pub logout: Callback<()>,
}

/// Restores the cookie session on start and exposes login/logout
#[hook]
pub fn use_session() -> SessionActions {
    let app = use_app();
    let config = use_config();

    use_effect_with((), {
        let app = app.clone();
        let api = ApiClient::new(config.base_url(), None);

        move |_| {
            spawn_local(async move {
                match api.me().await {
                    Ok(user) => {
                        Logger::info_with_component("session", &format!("restored session for {}", user.username));
                        app.dispatch(AppAction::SignedIn { user, token: None });
                    }
                    Err(ApiError::Unauthorized) => app.dispatch(AppAction::SignedOut),
                    Err(e) => {
                        Logger::warn_with_component("session", &format!("session check failed: {}", e));
                        app.dispatch(AppAction::Ready);
                    }
                }
            });
            || ()
        }
    });

    let login = {
        let app = app.clone();
        let config = config.clone();
        Callback::from(move |(request, on_failure): (LoginRequest, Callback<ApiError>)| {
            let app = app.clone();
            let anonymous = ApiClient::new(config.base_url(), None);
            let base_url = config.base_url().to_string();

            spawn_local(async move {
                let token = match anonymous.login(&request).await {
                    Ok(response) => response.access_token,
                    Err(e) => {
                        on_failure.emit(e);
                        return;
                    }
                };
                let api = ApiClient::new(&base_url, Some(token.clone()));
                match api.me().await {
                    Ok(user) => {
                        Logger::info_with_component("session", &format!("signed in as {}", user.username));
                        app.dispatch(AppAction::SignedIn {
                            user,
                            token: Some(token),
                        });
                        for resource in [
                            Resource::CategoryTree,
                            Resource::Transactions,
                            Resource::BankAccounts,
                        ] {
                            app.dispatch(AppAction::Invalidate(resource));
                        }
                    }
                    Err(e) => on_failure.emit(e),
                }
            });
        })
    };

    let logout = {
        let app = app.clone();
        let config = config.clone();
        Callback::from(move |_| {
            let app = app.clone();
            let api = ApiClient::new(config.base_url(), app.token.clone());
            spawn_local(async move {
                if let Err(e) = api.logout().await {
                    Logger::warn_with_component("session", &format!("logout request failed: {}", e));
                }
                app.dispatch(AppAction::SignedOut);
            });
        })
    };

    SessionActions { login, logout }
}
