#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]

//! Wire models, the page route table, and client configuration shared by the
//! CareBridge client library and command-line tools.

pub mod config;
pub mod models;
pub mod routes;
