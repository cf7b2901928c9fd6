//! taskdeck: a small task-tracking service and its client layer.
//!
//! Server side: axum REST API over a redb store (api, auth, db, models).
//! Client side: a generic authenticated HTTP helper plus the two headless
//! views the binaries and tests drive (client::*).

pub mod api;
pub mod auth;
pub mod db;
pub mod models;

pub mod client {
    pub mod http;
    pub mod task_form;
    pub mod tasks_view;
    pub mod validation;
}
