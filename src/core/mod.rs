// Author: Dustin Pilgrim
// License: MIT

pub mod action;
pub mod activity;
pub mod error;
pub mod events;
pub mod info;
pub mod manager;
pub mod manager_msg;
pub mod session;
pub mod store;
pub mod utils;

#[cfg(test)]
mod manager_tests;
