//! UI components module.
//!
//! Contains ratatui widgets for the login, entry, listing and detail screens.

pub mod detail;
pub mod form;
pub mod list;
pub mod login;
pub mod search;
pub mod tabs;

pub use detail::render_detail;
pub use form::render_form;
pub use list::render_list;
pub use login::render_login;
pub use search::render_search;
pub use tabs::render_tabs;
