//! Data entry: the project form, the login form, and the rules and
//! previews they share.

pub mod entry;
pub mod login;
pub mod preview;
pub mod validation;

pub use entry::{EntryForm, SUBMIT_SUCCESS, SubmissionState};
pub use login::{LoginField, LoginForm};
pub use preview::Preview;
