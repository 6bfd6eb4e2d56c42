use std::rc::Rc;

use yew::prelude::*;

use crate::types::{Loop, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A transient notification shown by the toast host.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

/// Application state distributed to components through a `ContextProvider`.
/// This replaces ambient global lookup with an explicit, typed contract:
/// consumers read the fields they need and write only through `notify`.
#[derive(Clone, PartialEq)]
pub struct AppState {
    pub auth_user: User,
    pub active_loop: Loop,
    pub members: Rc<Vec<User>>,
    /// Whether the authenticated user administers the active loop.
    pub is_loop_admin: bool,
    /// Sink for transient notifications (toasts).
    pub notify: Callback<(ToastKind, String)>,
}

impl AppState {
    pub fn member(&self, uid: &str) -> Option<&User> {
        self.members.iter().find(|member| member.uid == uid)
    }
}

#[hook]
pub fn use_app_state() -> AppState {
    use_context::<AppState>().expect("AppState context not provided")
}
