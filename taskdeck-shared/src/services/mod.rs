//! Per-user resource services
//!
//! Every operation takes the authenticated subject extracted from a
//! validated token and enforces ownership before touching the store:
//!
//! - [`todos`]: to-do items; absent and foreign items are both `NotFound`
//! - [`users`]: profile operations; the target must be the subject itself

pub mod todos;
pub mod users;
