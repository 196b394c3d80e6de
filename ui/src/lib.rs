//! Browser entry point for the admin login page.
//!
//! Build with `trunk build --release` (see `index.html`) after exporting
//! `SUPABASE_URL` and `SUPABASE_ANON_KEY`; both are embedded in the bundle.

pub mod dom;

use std::rc::Rc;

use confessions_business::{LoginFormController, SupabaseAuth, SupabaseConfig};
use log::{error, info};
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure, prelude::wasm_bindgen};
use wasm_bindgen_futures::spawn_local;

pub use dom::{BindError, BrowserNavigator, DomLoginForm, DomSubmitEvent, LoginPage};

type DomController = LoginFormController<SupabaseAuth, DomLoginForm, BrowserNavigator>;

/// Console log level: everything in debug builds, warnings and errors otherwise.
pub fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Warn
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // Redirect `log` messages to `console.log` and friends.
    console_log::init_with_level(log_level()).ok();

    let config = SupabaseConfig::embedded().map_err(|e| {
        error!("login page: {e}");
        JsValue::from_str(&e.to_string())
    })?;

    mount(config).map_err(|e| {
        error!("login page: {e}");
        JsValue::from_str(&e.to_string())
    })
}

/// Binds the login form on the current page to the auth provider.
pub fn mount(config: SupabaseConfig) -> Result<(), BindError> {
    let window = web_sys::window().ok_or(BindError::NoWindow)?;
    let document = window.document().ok_or(BindError::NoDocument)?;

    let LoginPage { form_element, form } = LoginPage::bind(&document)?;
    let controller: Rc<DomController> = Rc::new(LoginFormController::new(
        SupabaseAuth::new(config),
        form,
        BrowserNavigator::new(window),
    ));

    let on_submit = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        // Must run while the event is dispatching, before any await.
        controller.intercept(&DomSubmitEvent::new(&event));

        let controller = Rc::clone(&controller);
        spawn_local(async move {
            controller.submit().await;
        });
    });

    form_element
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(|e| BindError::Js(format!("{e:?}")))?;
    // The listener lives as long as the page.
    on_submit.forget();

    info!("login page: form bound");
    Ok(())
}
