//! Interactive terminal client for a running gateway.
//!
//! Wraps the core `ClientRelay` with a readline prompt, a spinner for the
//! thinking placeholder and styled message bubbles. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
