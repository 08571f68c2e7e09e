#![forbid(unsafe_code)]

mod client;
mod query;
mod sign;

pub use client::Client;

pub use query::{
    Query,
    QueryOptions,
    DEFAULT_FORMAT,
    DEFAULT_LIMIT,
    DEFAULT_OFFSET,
};

pub use sign::{
    sign,
    QueryError,
    DEFAULT_DOMAIN,
};
