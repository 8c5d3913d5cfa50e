//! Collaborators of a check: where container state comes from and where
//! reports go.

pub mod docker;
pub mod heartbeat;
pub mod slack;
