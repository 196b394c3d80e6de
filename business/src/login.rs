//! Admin login form handling.
//!
//! [`LoginFormController`] owns the whole submit cycle of the login page:
//!
//! 1. Stops the browser's own form submission
//! 2. Clears the error left over from the previous attempt
//! 3. Reads email, password and the remember-me checkbox
//! 4. Calls the [`AuthService`] once and waits for it
//! 5. On failure, shows the provider's message verbatim
//! 6. On success, navigates to [`NAVIGATION_TARGET`]
//!
//! No validation is done on the fields; the provider is the only judge.
//! While a call is outstanding the submit control is disabled and further
//! submissions are dropped, so one attempt can never clobber another.
//!
//! The page itself is reached through the [`LoginForm`], [`Navigator`] and
//! [`SubmitEvent`] seams so the controller runs the same against the DOM and
//! against test fakes.

use std::cell::Cell;

use log::{debug, info, warn};

use crate::auth::{AuthService, Credentials};

/// Page loaded after a successful sign-in, relative to the login page.
pub const NAVIGATION_TARGET: &str = "index.html";

/// The form element's submit event.
pub trait SubmitEvent {
    /// Suppresses the browser's full-page form submission.
    fn prevent_default(&self);
}

/// The login form's fields and its error region.
pub trait LoginForm {
    fn email(&self) -> String;
    fn password(&self) -> String;
    fn remember_me(&self) -> bool;

    /// Replaces the text of the error region.
    fn set_error(&self, message: &str);
    fn clear_error(&self);

    /// Disables (`true`) or re-enables (`false`) the submit control.
    fn set_submitting(&self, submitting: bool);
}

/// Browser location.
pub trait Navigator {
    fn navigate(&self, target: &str);
}

/// Field values captured at the moment of submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFields {
    pub credentials: Credentials,
    /// Read but not acted upon. Whether it should shorten or extend the
    /// session lifetime is still an open product question.
    pub remember_me: bool,
}

impl LoginFields {
    pub fn read<F: LoginForm + ?Sized>(form: &F) -> Self {
        Self {
            credentials: Credentials::new(form.email(), form.password()),
            remember_me: form.remember_me(),
        }
    }
}

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
    ErrorDisplayed,
    Navigating,
}

/// What a single submit event led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Sign-in succeeded and the browser was sent to [`NAVIGATION_TARGET`].
    Navigated,
    /// Sign-in failed; the message is now shown in the error region.
    Failed(String),
    /// Another attempt was still outstanding; nothing was sent.
    Ignored,
}

/// Drives one login form against one auth provider.
///
/// The controller is single-threaded: it is shared by reference (or `Rc`)
/// between the event listener and the in-flight attempt.
#[derive(Debug)]
pub struct LoginFormController<A, F, N> {
    auth: A,
    form: F,
    navigator: N,
    phase: Cell<LoginPhase>,
}

impl<A, F, N> LoginFormController<A, F, N>
where
    A: AuthService,
    F: LoginForm,
    N: Navigator,
{
    pub fn new(auth: A, form: F, navigator: N) -> Self {
        Self {
            auth,
            form,
            navigator,
            phase: Cell::new(LoginPhase::Idle),
        }
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase.get()
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Handles a submit event.
    ///
    /// The default action is prevented before this returns, while the event
    /// is still being dispatched; the sign-in itself happens in the returned
    /// future.
    pub fn handle_submit<E: SubmitEvent + ?Sized>(
        &self,
        event: &E,
    ) -> impl Future<Output = SubmitOutcome> + '_ {
        self.intercept(event);
        self.submit()
    }

    /// Synchronous half of [`Self::handle_submit`].
    pub fn intercept<E: SubmitEvent + ?Sized>(&self, event: &E) {
        event.prevent_default();
    }

    /// Asynchronous half of [`Self::handle_submit`]: one sign-in attempt.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.phase.get() == LoginPhase::Submitting {
            debug!("LoginFormController: attempt already outstanding, ignoring submit");
            return SubmitOutcome::Ignored;
        }

        self.form.clear_error();
        let LoginFields {
            credentials,
            remember_me,
        } = LoginFields::read(&self.form);

        debug!(
            "LoginFormController: signing in '{}' (remember me: {remember_me})",
            credentials.email
        );

        self.phase.set(LoginPhase::Submitting);
        self.form.set_submitting(true);

        let result = self.auth.sign_in_with_password(&credentials).await;
        drop(credentials);

        self.form.set_submitting(false);

        match result {
            Ok(session) => {
                info!(
                    "LoginFormController: signed in as user {}, redirecting to {NAVIGATION_TARGET}",
                    session.user.id
                );
                self.phase.set(LoginPhase::Navigating);
                self.navigator.navigate(NAVIGATION_TARGET);
                SubmitOutcome::Navigated
            }
            Err(failure) => {
                warn!("LoginFormController: sign-in failed: {failure}");
                self.form.set_error(failure.message());
                self.phase.set(LoginPhase::ErrorDisplayed);
                SubmitOutcome::Failed(failure.message().to_owned())
            }
        }
    }
}
