//! Form actions for the sign-in page
//!
//! Login and signup forward the submitted form to the Syfit API and turn a
//! successful reply into the `token` session cookie. Signout only drops the
//! cookie.

pub mod handlers;
mod models;
mod session;

pub use handlers::{login, signout, signup};
pub use models::{ActionFailure, ErrorDetail, FormFields, TokenResponse, DEFAULT_MEASUREMENT_SYSTEM};
pub use session::HOME_ROUTE;
