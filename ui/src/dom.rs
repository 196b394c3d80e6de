//! DOM implementations of the login form seams.

use confessions_business::{LoginForm, Navigator, SubmitEvent};
use log::error;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement, Window,
};

pub const FORM_ID: &str = "admin-login-form";
pub const EMAIL_ID: &str = "admin-email";
pub const PASSWORD_ID: &str = "admin-password";
pub const REMEMBER_ME_ID: &str = "remember-me";
pub const ERROR_ID: &str = "error-message";

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("element #{id} is a <{found}>, not a {expected}")]
    WrongElementType {
        id: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// The elements of the login page.
pub struct LoginPage {
    pub form_element: HtmlFormElement,
    pub form: DomLoginForm,
}

impl LoginPage {
    pub fn bind(document: &Document) -> Result<Self, BindError> {
        let form_element: HtmlFormElement = lookup(document, FORM_ID, "form")?;

        let submit = form_element
            .query_selector("button[type=submit]")
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok());

        let form = DomLoginForm {
            email: lookup(document, EMAIL_ID, "input")?,
            password: lookup(document, PASSWORD_ID, "input")?,
            remember_me: lookup(document, REMEMBER_ME_ID, "input")?,
            error: document
                .get_element_by_id(ERROR_ID)
                .ok_or(BindError::MissingElement(ERROR_ID))?,
            submit,
        };

        Ok(Self { form_element, form })
    }
}

fn lookup<T: JsCast>(
    document: &Document,
    id: &'static str,
    expected: &'static str,
) -> Result<T, BindError> {
    document
        .get_element_by_id(id)
        .ok_or(BindError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|element| BindError::WrongElementType {
            id,
            expected,
            found: element.tag_name().to_lowercase(),
        })
}

pub struct DomLoginForm {
    email: HtmlInputElement,
    password: HtmlInputElement,
    remember_me: HtmlInputElement,
    error: Element,
    /// Forms without an explicit submit button still work; there is just
    /// nothing to disable.
    submit: Option<HtmlButtonElement>,
}

impl LoginForm for DomLoginForm {
    fn email(&self) -> String {
        self.email.value()
    }

    fn password(&self) -> String {
        self.password.value()
    }

    fn remember_me(&self) -> bool {
        self.remember_me.checked()
    }

    fn set_error(&self, message: &str) {
        self.error.set_text_content(Some(message));
    }

    fn clear_error(&self) {
        self.error.set_text_content(Some(""));
    }

    fn set_submitting(&self, submitting: bool) {
        if let Some(button) = &self.submit {
            button.set_disabled(submitting);
        }
    }
}

pub struct BrowserNavigator {
    window: Window,
}

impl BrowserNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, target: &str) {
        if let Err(e) = self.window.location().set_href(target) {
            error!("navigation to {target} failed: {e:?}");
        }
    }
}

pub struct DomSubmitEvent<'a> {
    event: &'a Event,
}

impl<'a> DomSubmitEvent<'a> {
    pub fn new(event: &'a Event) -> Self {
        Self { event }
    }
}

impl SubmitEvent for DomSubmitEvent<'_> {
    fn prevent_default(&self) {
        self.event.prevent_default();
    }
}
