pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod contact;
pub mod content;
pub mod db;
pub mod dsa;
pub mod error;
pub mod forms;
pub mod leetcode;
pub mod projects;
pub mod retrospectives;
pub mod slug;
pub mod state;
pub mod storage;
pub mod uploads;

#[cfg(test)]
mod memory;
