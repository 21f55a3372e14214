//! Article feed for a portfolio blog.
//!
//! Fetches a JSON list of articles, validates it, and presents it as a
//! filterable, paginated list with accordion expansion and `?slug=` deep
//! links. The [`controller::FeedController`] owns the state and renders
//! through a [`render::RenderPort`]; the binary provides an HTML host
//! (static page rendering) and a terminal host.

pub mod config;
pub mod controller;
pub mod feed;
pub mod render;
pub mod template;
pub mod util;
