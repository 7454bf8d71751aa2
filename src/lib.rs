//! A trie-based URL router.
//!
//! Patterns are split on `/` and compiled segment by segment:
//!
//! | segment          | matches                                   | captures            |
//! |------------------|-------------------------------------------|---------------------|
//! | `users`          | the literal text                          |                     |
//! | `:id`            | one whole segment                         | `:id`               |
//! | `:id([0-9]+)`    | a segment matching the regex              | `:id`               |
//! | `:id:int`        | digits                                    | `:id`               |
//! | `:name:string`   | word characters                           | `:name`             |
//! | `*`              | everything after it                       | `*`, `*0`, `*1`, …  |
//! | `*.*`            | the rest, split at the last `.`           | `:path`, `:ext`     |
//! | `?:id` (last)    | the route with or without this segment    | `:id` when present  |
//!
//! Static segments win over regex segments, which win over path-extension,
//! holder and catch-all segments, in that order.

#![forbid(unsafe_code)]

mod decode;
mod pattern;
mod tree;

pub use crate::pattern::PatternKind;
pub use crate::tree::{match_test, Leaf, LeafId, Params, RouterError, Tree};

#[cfg(feature = "http-router")]
mod http_router;

#[cfg(feature = "http-router")]
pub use crate::http_router::{HttpRouter, Method, Route};

#[cfg(feature = "hyper-service")]
mod hyper_service;

#[cfg(feature = "hyper-service")]
pub use crate::hyper_service::{
    BoxHandler, Handler, HandlerFuture, NotFound, RouterService, SharedRouterService,
};
