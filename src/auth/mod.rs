//! User accounts, the session cookie, and the pages for signing in and out.

mod cookie;
mod email;
mod log_in;
mod log_out;
mod password;
mod register_user;
mod session;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use email::Email;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_register_page, register_user};
pub use session::{Session, SessionEvent, SessionEvents, SessionState, refresh_session};
pub(super) use token::Token;
pub use user::{User, UserID, create_user, create_user_table, get_user_by_email};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
