//! Test doubles for the login form seams.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use confessions_business::{
    AuthFailure, AuthService, Credentials, LoginForm, Navigator, Session, SubmitEvent, User,
};

/// Everything the controller did to the form, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ClearError,
    SetError(String),
    Submitting(bool),
}

#[derive(Debug, Default)]
pub struct FakeForm {
    pub email: RefCell<String>,
    pub password: RefCell<String>,
    pub remember_me: Cell<bool>,
    pub error_text: RefCell<String>,
    pub submit_disabled: Cell<bool>,
    pub events: RefCell<Vec<FormEvent>>,
}

impl FakeForm {
    pub fn filled(email: &str, password: &str, remember_me: bool) -> Self {
        let form = Self::default();
        *form.email.borrow_mut() = email.to_owned();
        *form.password.borrow_mut() = password.to_owned();
        form.remember_me.set(remember_me);
        form
    }

    pub fn error_text(&self) -> String {
        self.error_text.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<FormEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl LoginForm for FakeForm {
    fn email(&self) -> String {
        self.email.borrow().clone()
    }

    fn password(&self) -> String {
        self.password.borrow().clone()
    }

    fn remember_me(&self) -> bool {
        self.remember_me.get()
    }

    fn set_error(&self, message: &str) {
        *self.error_text.borrow_mut() = message.to_owned();
        self.events
            .borrow_mut()
            .push(FormEvent::SetError(message.to_owned()));
    }

    fn clear_error(&self) {
        self.error_text.borrow_mut().clear();
        self.events.borrow_mut().push(FormEvent::ClearError);
    }

    fn set_submitting(&self, submitting: bool) {
        self.submit_disabled.set(submitting);
        self.events
            .borrow_mut()
            .push(FormEvent::Submitting(submitting));
    }
}

#[derive(Debug, Default)]
pub struct FakeNavigator {
    pub visited: RefCell<Vec<String>>,
}

impl FakeNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }
}

impl Navigator for FakeNavigator {
    fn navigate(&self, target: &str) {
        self.visited.borrow_mut().push(target.to_owned());
    }
}

#[derive(Debug, Default)]
pub struct FakeSubmitEvent {
    pub prevented: Cell<u32>,
}

impl SubmitEvent for FakeSubmitEvent {
    fn prevent_default(&self) {
        self.prevented.set(self.prevented.get() + 1);
    }
}

/// Auth provider that replays scripted replies and records every call.
///
/// Each call yields to the executor once before replying, so a second
/// submission can be polled while the first one is outstanding.
#[derive(Debug, Default)]
pub struct FakeAuth {
    pub calls: RefCell<Vec<Credentials>>,
    replies: RefCell<VecDeque<Result<Session, AuthFailure>>>,
}

impl FakeAuth {
    pub fn replying(replies: impl IntoIterator<Item = Result<Session, AuthFailure>>) -> Self {
        Self {
            calls: RefCell::default(),
            replies: RefCell::new(replies.into_iter().collect()),
        }
    }

    pub fn calls(&self) -> Vec<Credentials> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AuthService for FakeAuth {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthFailure> {
        self.calls.borrow_mut().push(credentials.clone());
        tokio::task::yield_now().await;
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AuthFailure::new("no scripted reply")))
    }
}

pub fn session_for(email: &str) -> Session {
    Session {
        access_token: "access-token".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        refresh_token: "refresh-token".to_owned(),
        user: User {
            id: "8d0fd2b3-9ca7-4c55-a4b4-3c6f2a7f2f10".to_owned(),
            email: Some(email.to_owned()),
        },
    }
}
