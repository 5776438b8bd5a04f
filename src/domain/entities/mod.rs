//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs use separate `New*`
//! structs so that store-assigned fields (ids, timestamps) never have to be
//! invented by callers.
//!
//! - [`ShortLink`] / [`LinkStatus`] - shortened URL and its soft-delete tag
//! - [`Click`] - one recorded access
//! - [`Expiry`] - relative lifetime requested at creation
//! - [`User`] - registered account
//! - [`Session`] - login session with sliding expiry

pub mod click;
pub mod expiry;
pub mod link;
pub mod session;
pub mod user;

pub use click::{Click, ClickStamp, NewClick};
pub use expiry::{Expiry, ExpiryUnit};
pub use link::{LinkStatus, LinkWithHistory, NewShortLink, ShortLink};
pub use session::{SESSION_IDLE_TIMEOUT_SECS, Session, session_idle_timeout};
pub use user::{NewUser, User};
