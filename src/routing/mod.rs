//! Routing
//!
//! Declarative route tree mapping URL paths to pages, with guards placed on
//! branches so a whole subtree inherits the gating decision.
//!
//! - [`path`]: pattern parsing and request path normalization
//! - [`pages`]: page catalog and per-page backend endpoints
//! - [`RouteTable::hotel`]: the application's route tree

pub mod pages;
pub mod path;
mod table;
mod tree;

pub use pages::{Layout, Page};
pub use table::RouteTable;
pub use tree::{Navigation, Redirect, RouteEntry, RouteMatch, RouteNode};

use std::collections::BTreeMap;

/// Route parameters captured from `:name` segments
pub type Params = BTreeMap<String, String>;
