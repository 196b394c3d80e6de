//! Business logic for the confessions admin site.
//!
//! - [`login`]: the admin login form controller and the seams it drives.
//! - [`auth`]: the hosted auth provider client.
//! - [`confessions`], [`instagram`] and [`bot`]: the queue publisher that posts
//!   approved confessions.

pub mod auth;
pub mod bot;
pub mod config;
pub mod confessions;
pub mod instagram;
pub mod login;

pub use auth::{AuthFailure, AuthService, Credentials, Session, SupabaseAuth, User};
pub use bot::{BotError, RunReport, process_one_confession};
pub use config::{BotConfig, ConfigError, DEFAULT_GRAPH_API_VERSION, SupabaseConfig};
pub use confessions::{Confession, ConfessionStatus, ConfessionStore, QueuedConfession, StoreError};
pub use instagram::{InstagramPublisher, PublishError};
pub use login::{
    LoginFields, LoginForm, LoginFormController, LoginPhase, NAVIGATION_TARGET, Navigator,
    SubmitEvent, SubmitOutcome,
};
