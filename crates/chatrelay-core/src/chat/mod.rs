//! Backend gateway: conversation memory, bot identity and the message path.

pub mod gateway;
pub mod history;
pub mod identity;
pub mod prompt;
