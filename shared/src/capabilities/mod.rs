mod location;

pub use self::location::{
    Location, LocationOperation, LocationOutput, LocationSubscription, SubscriptionId,
};

// We use Crux's built-in Render and Http capabilities directly; only the
// location service needs a protocol of its own.
pub use crux_core::render::Render;
pub use crux_http::Http;

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub location: Location<Event>,
    pub render: Render<Event>,
}
