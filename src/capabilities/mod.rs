//! Capability set for the admin core.
//!
//! Render and HTTP come straight from the Crux capability crates; the
//! core performs no other I/O. Every remote list is a single fetch per
//! screen mount, resolved back into the update loop as an event.

use crux_core::render::Render;
use crux_http::Http;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
}
