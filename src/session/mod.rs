//! Session lifecycle, from handshake to teardown

mod directive;
mod handler;
mod handshake;

pub use handler::handle_connection;
