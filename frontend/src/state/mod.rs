pub mod app_state;

pub use app_state::{AppAction, AppState, Notice, NoticeLevel, Resource, Section};

use crate::services::{ApiClient, Logger};
use shared::{ApiError, ClientConfig};
use std::rc::Rc;
use yew::prelude::*;

pub type AppContext = UseReducerHandle<AppState>;

/// Read-only settings shared by every component
#[derive(Debug, Clone, PartialEq)]
pub struct AppServices {
    pub config: Rc<ClientConfig>,
}

#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("app context not found")
}

#[hook]
pub fn use_config() -> Rc<ClientConfig> {
    use_context::<AppServices>()
        .map(|services| services.config)
        .unwrap_or_default()
}

/// API client carrying the current session token
#[hook]
pub fn use_api() -> ApiClient {
    let app = use_app();
    let config = use_config();
    ApiClient::new(config.base_url(), app.token.clone())
}

pub fn notify(app: &AppContext, level: NoticeLevel, message: impl Into<String>) {
    app.dispatch(AppAction::Notify(level, message.into()));
}

/// Route a failed request: an expired session signs out, a permission
/// failure returns to the ledger, anything else becomes one notice.
pub fn report_error(app: &AppContext, component: &str, error: &ApiError) {
    match error {
        ApiError::Unauthorized => {
            Logger::warn_with_component(component, "session expired");
            app.dispatch(AppAction::SignedOut);
            notify(app, NoticeLevel::Warning, error.user_message());
        }
        ApiError::Forbidden => {
            Logger::warn_with_component(component, "request forbidden");
            notify(app, NoticeLevel::Warning, error.user_message());
            app.dispatch(AppAction::Navigate(Section::Ledger));
        }
        other => {
            Logger::error_with_component(component, &other.to_string());
            notify(app, NoticeLevel::Error, other.user_message());
        }
    }
}

/// Text a form shows next to its fields, for errors that belong there
pub fn inline_message(error: &ApiError) -> Option<String> {
    match error {
        ApiError::Validation(_) => Some(error.user_message()),
        _ => None,
    }
}

/// Validation messages are shown inline by the form that caused them;
/// every other error goes through [`report_error`].
pub fn inline_or_report(app: &AppContext, component: &str, error: &ApiError) -> Option<String> {
    let message = inline_message(error);
    if message.is_none() {
        report_error(app, component, error);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_are_shown_inline() {
        let duplicate = ApiError::from_response(409, r#"{"detail":"Category name already exists"}"#);
        assert_eq!(inline_message(&duplicate).as_deref(), Some("Category name already exists"));

        let missing = ApiError::from_response(422, r#"{"detail":[{"msg":"name is required"}]}"#);
        assert_eq!(inline_message(&missing).as_deref(), Some("name is required"));
    }

    #[test]
    fn test_other_failures_are_not_inline() {
        assert_eq!(inline_message(&ApiError::Unauthorized), None);
        assert_eq!(inline_message(&ApiError::from_response(500, "")), None);
        assert_eq!(inline_message(&ApiError::Network("offline".to_string())), None);
    }
}
