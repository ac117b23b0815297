//! A command-line client for the [RCON](https://wiki.vg/RCON) protocol used
//! by minecraft servers.
//!
//! The binary resolves a [`config::Config`] from flags and environment,
//! opens one [`rcon::RconClient`] session, and hands it to
//! [`dispatch::dispatch`] to run commands in batch or terminal mode.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod output;
pub mod rcon;
