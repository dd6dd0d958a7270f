//! ticketbot — guided chat-to-ticket intake bot.

pub mod attachments;
pub mod bot;
pub mod channels;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod lang;
pub mod store;
pub mod tracker;
