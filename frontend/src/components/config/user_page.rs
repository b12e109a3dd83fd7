use crate::components::fields::{input_checked, input_value, select_value};
use crate::hooks::FetchGuard;
use crate::state::{inline_or_report, notify, report_error, use_api, use_app, AppAction, NoticeLevel, Resource};
use shared::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Shanghai";
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_PASSWORD_LENGTH: usize = 128;

fn role_from_key(key: &str) -> UserRole {
    if key == "admin" {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

fn role_key(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::User => "user",
    }
}

fn check_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length == 0 || length > MAX_PASSWORD_LENGTH {
        return Err(format!("Password must be 1 to {} characters", MAX_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Fields of the create-user form, also reused for editing
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub username: String,
    /// Blank while editing keeps the current password
    pub password: String,
    pub role: UserRole,
    pub is_active: bool,
    pub time_zone: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: UserRole::User,
            is_active: true,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl UserDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            role: user.role,
            is_active: user.is_active,
            time_zone: user.time_zone.clone(),
        }
    }

    pub fn to_create_request(&self) -> Result<CreateUserRequest, String> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(format!("Username must be 1 to {} characters", MAX_USERNAME_LENGTH));
        }
        check_password(&self.password)?;
        let time_zone = self.time_zone.trim();
        Ok(CreateUserRequest {
            username: username.to_string(),
            password: self.password.clone(),
            role: self.role,
            is_active: self.is_active,
            time_zone: if time_zone.is_empty() {
                DEFAULT_TIME_ZONE.to_string()
            } else {
                time_zone.to_string()
            },
        })
    }

    /// Only the fields that differ from `original`; `None` when nothing changed
    pub fn to_update_request(&self, original: &User) -> Result<Option<UpdateUserRequest>, String> {
        let password = if self.password.is_empty() {
            None
        } else {
            check_password(&self.password)?;
            Some(self.password.clone())
        };
        let time_zone = self.time_zone.trim();
        let request = UpdateUserRequest {
            password,
            role: (self.role != original.role).then_some(self.role),
            is_active: (self.is_active != original.is_active).then_some(self.is_active),
            time_zone: (!time_zone.is_empty() && time_zone != original.time_zone).then(|| time_zone.to_string()),
        };
        Ok((request != UpdateUserRequest::default()).then_some(request))
    }
}

#[function_component(UserPage)]
pub fn user_page() -> Html {
    let app = use_app();
    let api = use_api();
    let users = use_state(Vec::<User>::new);
    let loading = use_state(|| false);
    let editing = use_state(|| None::<User>);
    let draft = use_state(UserDraft::default);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);
    let generation = app.generation(Resource::Users);
    let current_user_id = app.user.as_ref().map(|u| u.id);

    use_effect_with(generation, {
        let app = app.clone();
        let api = api.clone();
        let users = users.clone();
        let loading = loading.clone();
        move |_| {
            let guard = FetchGuard::new();
            loading.set(true);
            let in_flight = guard.clone();
            spawn_local(async move {
                let result = api.users().await;
                if !in_flight.is_current() {
                    return;
                }
                match result {
                    Ok(list) => users.set(list),
                    Err(e) => report_error(&app, "user_page", &e),
                }
                loading.set(false);
            });
            guard.canceller()
        }
    });

    let edit = |apply: fn(&mut UserDraft, String)| {
        let draft = draft.clone();
        move |value: String| {
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        }
    };
    let text_input = |apply: fn(&mut UserDraft, String)| {
        let set = edit(apply);
        Callback::from(move |e: InputEvent| set(input_value(&e)))
    };
    let on_role = {
        let set = edit(|d, v| d.role = role_from_key(&v));
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_active = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            draft.set(UserDraft {
                is_active: input_checked(&e),
                ..(*draft).clone()
            });
        })
    };

    let reset = {
        let editing = editing.clone();
        let draft = draft.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            draft.set(UserDraft::default());
            error.set(None);
        })
    };

    let on_submit = {
        let app = app.clone();
        let api = api.clone();
        let editing = editing.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let app = app.clone();
            let api = api.clone();
            let editing = editing.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let error = error.clone();

            match (*editing).clone() {
                Some(user) => {
                    let request = match draft.to_update_request(&user) {
                        Ok(Some(request)) => request,
                        Ok(None) => {
                            editing.set(None);
                            draft.set(UserDraft::default());
                            return;
                        }
                        Err(message) => {
                            error.set(Some(message));
                            return;
                        }
                    };
                    saving.set(true);
                    error.set(None);
                    spawn_local(async move {
                        match api.update_user(user.id, &request).await {
                            Ok(_) => {
                                notify(&app, NoticeLevel::Success, format!("Updated {}", user.username));
                                app.dispatch(AppAction::Invalidate(Resource::Users));
                                editing.set(None);
                                draft.set(UserDraft::default());
                            }
                            Err(e) => error.set(inline_or_report(&app, "user_page", &e)),
                        }
                        saving.set(false);
                    });
                }
                None => {
                    let request = match draft.to_create_request() {
                        Ok(request) => request,
                        Err(message) => {
                            error.set(Some(message));
                            return;
                        }
                    };
                    saving.set(true);
                    error.set(None);
                    spawn_local(async move {
                        match api.create_user(&request).await {
                            Ok(user) => {
                                notify(&app, NoticeLevel::Success, format!("Created {}", user.username));
                                app.dispatch(AppAction::Invalidate(Resource::Users));
                                draft.set(UserDraft::default());
                            }
                            Err(e) => error.set(inline_or_report(&app, "user_page", &e)),
                        }
                        saving.set(false);
                    });
                }
            }
        })
    };

    let start_edit = |user: &User| {
        let editing = editing.clone();
        let draft = draft.clone();
        let error = error.clone();
        let user = user.clone();
        Callback::from(move |_: MouseEvent| {
            draft.set(UserDraft::from_user(&user));
            editing.set(Some(user.clone()));
            error.set(None);
        })
    };

    let is_editing = editing.is_some();
    // The server refuses to demote or disable the signed-in admin
    let editing_self = editing.as_ref().map(|u| u.id) == current_user_id && is_editing;

    html! {
        <div class="config-page users">
            <section class="config-form">
                <h2>{if is_editing { format!("Edit {}", draft.username) } else { "New user".to_string() }}</h2>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}
                <form onsubmit={on_submit}>
                    <div class="form-row">
                        <div class="form-group">
                            <label>{"Username"}</label>
                            <input
                                type="text"
                                value={draft.username.clone()}
                                disabled={is_editing}
                                oninput={text_input(|d, v| d.username = v)}
                            />
                        </div>
                        <div class="form-group">
                            <label>{if is_editing { "New password" } else { "Password" }}</label>
                            <input
                                type="password"
                                autocomplete="new-password"
                                placeholder={if is_editing { "Leave blank to keep" } else { "" }}
                                value={draft.password.clone()}
                                oninput={text_input(|d, v| d.password = v)}
                            />
                        </div>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label>{"Role"}</label>
                            <select onchange={on_role} disabled={editing_self}>
                                {for [UserRole::User, UserRole::Admin].into_iter().map(|role| html! {
                                    <option value={role_key(role)} selected={draft.role == role}>{role.label()}</option>
                                })}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>{"Time zone"}</label>
                            <input type="text" value={draft.time_zone.clone()} oninput={text_input(|d, v| d.time_zone = v)} />
                        </div>
                    </div>
                    <label class="checkbox">
                        <input type="checkbox" checked={draft.is_active} disabled={editing_self} onchange={on_active} />
                        {"Active"}
                    </label>
                    <div class="button-row">
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            {if *saving { "Saving..." } else { "Save" }}
                        </button>
                        {if is_editing {
                            html! { <button type="button" class="btn btn-secondary" onclick={reset}>{"Cancel"}</button> }
                        } else { html! {} }}
                    </div>
                </form>
            </section>
            <section class="config-list">
                <h2>{"Users"}</h2>
                {if *loading && users.is_empty() {
                    html! { <div class="loading">{"Loading users..."}</div> }
                } else {
                    html! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>{"Username"}</th>
                                    <th>{"Role"}</th>
                                    <th>{"Time zone"}</th>
                                    <th>{"Status"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for users.iter().map(|user| html! {
                                    <tr class={classes!((!user.is_active).then_some("inactive"))}>
                                        <td>
                                            {user.username.clone()}
                                            {if Some(user.id) == current_user_id {
                                                html! { <span class="muted">{" (you)"}</span> }
                                            } else { html! {} }}
                                        </td>
                                        <td>{user.role.label()}</td>
                                        <td>{user.time_zone.clone()}</td>
                                        <td>{if user.is_active { "Active" } else { "Disabled" }}</td>
                                        <td class="actions">
                                            <button class="btn btn-link" onclick={start_edit(user)}>{"Edit"}</button>
                                        </td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                    }
                }}
            </section>
        </div>
    }
}
