//! HTML template rendering handlers.

mod dashboard;
mod public;
mod verify_email;

pub use dashboard::{dashboard_handler, urls_handler};
pub use public::{
    home_handler, learn_more_handler, login_page_handler, not_found_handler,
    register_page_handler,
};
pub use verify_email::verify_email_page_handler;
