//! Management of live connections for the chat

mod state;

mod client;
pub use client::{Client, Outbound, Role};

mod hub;
pub use hub::Hub;
