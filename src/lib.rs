#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod api;
pub mod app;
pub mod chart;
pub mod classification;
pub mod cli;
pub mod clients;
pub mod config;
pub mod export;
pub mod fetch;
pub mod inference;
pub mod observability;
pub mod pipeline;
pub mod table;
pub mod ui;
pub mod video_id;
