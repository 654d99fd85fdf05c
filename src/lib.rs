// ABOUTME: Library crate for hsh-admin exposing the wizard, collection views and API client for testing and external use

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod cli;
pub mod collections;
pub mod config;
pub mod wizard;
