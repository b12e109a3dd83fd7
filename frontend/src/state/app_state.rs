use shared::AuthUser;
use std::collections::HashMap;
use std::rc::Rc;
use yew::prelude::*;

/// Top-level screens reachable from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Ledger,
    Categories,
    BankAccounts,
    Users,
    AuditLog,
    Stats,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Ledger,
        Section::Stats,
        Section::Categories,
        Section::BankAccounts,
        Section::Users,
        Section::AuditLog,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Ledger => "Ledger",
            Section::Categories => "Categories",
            Section::BankAccounts => "Bank accounts",
            Section::Users => "Users",
            Section::AuditLog => "Audit log",
            Section::Stats => "Statistics",
        }
    }

    pub fn admin_only(&self) -> bool {
        matches!(self, Section::Users | Section::AuditLog)
    }
}

/// Server-side data sets a mutation can make stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CategoryTree,
    CategoryTags,
    Transactions,
    BankAccounts,
    Users,
    Stats,
    AuditLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "notice notice-success",
            NoticeLevel::Info => "notice notice-info",
            NoticeLevel::Warning => "notice notice-warning",
            NoticeLevel::Error => "notice notice-error",
        }
    }
}

/// A non-blocking message shown above the current section
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Increases with every notice so timers can tell them apart
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub user: Option<AuthUser>,
    pub token: Option<String>,
    /// Session check has finished
    pub is_ready: bool,
    pub section: Section,
    pub notice: Option<Notice>,
    /// Newly created transaction to highlight in the list
    pub flash_transaction: Option<i64>,
    generations: HashMap<Resource, u64>,
    notice_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_ready: false,
            section: Section::Ledger,
            notice: None,
            flash_transaction: None,
            generations: HashMap::new(),
            notice_seq: 0,
        }
    }
}

impl AppState {
    /// Current generation of `resource`; hooks re-fetch when it changes
    pub fn generation(&self, resource: Resource) -> u64 {
        self.generations.get(&resource).copied().unwrap_or(0)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn can_open(&self, section: Section) -> bool {
        !section.admin_only() || self.is_admin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Ready,
    SignedIn { user: AuthUser, token: Option<String> },
    SignedOut,
    Navigate(Section),
    Invalidate(Resource),
    Notify(NoticeLevel, String),
    DismissNotice(u64),
    FlashTransaction(i64),
    ClearFlash(i64),
}

impl Reducible for AppState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            AppAction::Ready => next.is_ready = true,
            AppAction::SignedIn { user, token } => {
                next.user = Some(user);
                next.token = token;
                next.is_ready = true;
                if !next.can_open(next.section) {
                    next.section = Section::Ledger;
                }
            }
            AppAction::SignedOut => {
                next.user = None;
                next.token = None;
                next.is_ready = true;
                next.section = Section::Ledger;
                next.flash_transaction = None;
            }
            AppAction::Navigate(section) => {
                next.section = if next.can_open(section) {
                    section
                } else {
                    Section::Ledger
                };
            }
            AppAction::Invalidate(resource) => {
                *next.generations.entry(resource).or_insert(0) += 1;
            }
            AppAction::Notify(level, message) => {
                next.notice_seq += 1;
                next.notice = Some(Notice {
                    id: next.notice_seq,
                    level,
                    message,
                });
            }
            AppAction::DismissNotice(id) => {
                if next.notice.as_ref().is_some_and(|n| n.id == id) {
                    next.notice = None;
                } else {
                    return self;
                }
            }
            AppAction::FlashTransaction(id) => next.flash_transaction = Some(id),
            AppAction::ClearFlash(id) => {
                if next.flash_transaction == Some(id) {
                    next.flash_transaction = None;
                } else {
                    return self;
                }
            }
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserRole;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: 1,
            username: "alice".to_string(),
            role,
        }
    }

    fn apply(state: AppState, actions: Vec<AppAction>) -> Rc<AppState> {
        actions
            .into_iter()
            .fold(Rc::new(state), |state, action| state.reduce(action))
    }

    #[test]
    fn test_invalidate_bumps_only_that_resource() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::Invalidate(Resource::Transactions),
                AppAction::Invalidate(Resource::Transactions),
                AppAction::Invalidate(Resource::BankAccounts),
            ],
        );
        assert_eq!(state.generation(Resource::Transactions), 2);
        assert_eq!(state.generation(Resource::BankAccounts), 1);
        assert_eq!(state.generation(Resource::CategoryTree), 0);
    }

    #[test]
    fn test_sign_in_and_out() {
        let state = apply(
            AppState::default(),
            vec![AppAction::SignedIn {
                user: user(UserRole::Admin),
                token: Some("abc".to_string()),
            }],
        );
        assert!(state.is_ready);
        assert!(state.is_admin());
        assert_eq!(state.token.as_deref(), Some("abc"));

        let state = state.reduce(AppAction::Navigate(Section::Users));
        assert_eq!(state.section, Section::Users);

        let state = state.reduce(AppAction::SignedOut);
        assert!(!state.is_signed_in());
        assert_eq!(state.token, None);
        assert_eq!(state.section, Section::Ledger);
    }

    #[test]
    fn test_non_admin_cannot_open_admin_sections() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::SignedIn {
                    user: user(UserRole::User),
                    token: None,
                },
                AppAction::Navigate(Section::AuditLog),
            ],
        );
        assert_eq!(state.section, Section::Ledger);

        let state = state.reduce(AppAction::Navigate(Section::Stats));
        assert_eq!(state.section, Section::Stats);
    }

    #[test]
    fn test_dismiss_ignores_stale_notice_ids() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::Notify(NoticeLevel::Info, "first".to_string()),
                AppAction::Notify(NoticeLevel::Error, "second".to_string()),
                AppAction::DismissNotice(1),
            ],
        );
        let notice = state.notice.clone().unwrap();
        assert_eq!(notice.id, 2);
        assert_eq!(notice.message, "second");

        let state = state.reduce(AppAction::DismissNotice(2));
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_flash_is_cleared_only_for_same_row() {
        let state = apply(
            AppState::default(),
            vec![AppAction::FlashTransaction(7), AppAction::FlashTransaction(8), AppAction::ClearFlash(7)],
        );
        assert_eq!(state.flash_transaction, Some(8));
        let state = state.reduce(AppAction::ClearFlash(8));
        assert_eq!(state.flash_transaction, None);
    }
}
