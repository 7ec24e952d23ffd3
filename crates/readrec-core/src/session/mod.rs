//! Selection session domain types.
//!
//! The session is the single mutable record of the application: the user's
//! current genre/mood/level picks plus fetch status. All mutation goes
//! through [`SessionAction`] and [`SelectionSession::apply`].

pub mod action;
pub mod model;

pub use action::SessionAction;
pub use model::SelectionSession;
