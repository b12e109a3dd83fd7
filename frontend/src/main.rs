mod components;
mod hooks;
mod services;
mod state;

use anyhow::Context as _;
use components::{AuditLogView, BankAccountPage, CategoryPage, Header, LedgerPage, LoginPage, NoticeBar, StatsPage, UserPage};
use hooks::use_session;
use log::LevelFilter;
use services::Logger;
use shared::ClientConfig;
use state::{use_app, AppContext, AppServices, AppState, Section};
use std::rc::Rc;
use yew::prelude::*;

const CONFIG_JSON: &str = include_str!("../config.json");

fn load_config(raw: &str) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_json(raw).context("config.json is not valid JSON")?;
    config.validate().context("config.json has invalid settings")?;
    Ok(config)
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Rc<ClientConfig>,
}

#[function_component(Shell)]
fn shell() -> Html {
    let app = use_app();
    let session = use_session();

    if !app.is_ready {
        return html! { <div class="loading app-loading">{"Loading..."}</div> };
    }

    if !app.is_signed_in() {
        return html! {
            <>
                <NoticeBar />
                <LoginPage session={session} />
            </>
        };
    }

    let on_logout = session.logout.clone();
    let page = match app.section {
        Section::Ledger => html! { <LedgerPage /> },
        Section::Categories => html! { <CategoryPage /> },
        Section::BankAccounts => html! { <BankAccountPage /> },
        Section::Users => html! { <UserPage /> },
        Section::AuditLog => html! { <AuditLogView /> },
        Section::Stats => html! { <StatsPage /> },
    };

    html! {
        <div class="app">
            <Header on_logout={on_logout} />
            <main class="main">
                <div class="container">
                    <NoticeBar />
                    {page}
                </div>
            </main>
        </div>
    }
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let state: AppContext = use_reducer(AppState::default);
    let services = AppServices {
        config: props.config.clone(),
    };

    html! {
        <ContextProvider<AppServices> context={services}>
            <ContextProvider<AppContext> context={state}>
                <Shell />
            </ContextProvider<AppContext>>
        </ContextProvider<AppServices>>
    }
}

fn main() {
    let (config, problem) = match load_config(CONFIG_JSON) {
        Ok(config) => (config, None),
        Err(e) => (ClientConfig::default(), Some(format!("{:#}; using defaults", e))),
    };
    Logger::init(config.log_level_filter().unwrap_or(LevelFilter::Info));
    if let Some(problem) = problem {
        Logger::warn_with_component("main", &problem);
    }
    Logger::info_with_component("main", &format!("api base url {}", config.base_url()));

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_is_valid() {
        assert!(load_config(CONFIG_JSON).is_ok());
    }

    #[test]
    fn test_bad_config_is_rejected() {
        assert!(load_config("{ not json").is_err());
        assert!(load_config(r#"{"default_page_size": 7}"#).is_err());
    }
}
