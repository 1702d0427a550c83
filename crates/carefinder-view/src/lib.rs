//! Keeps a map surface and a list surface in step with a result set.
//!
//! The surfaces are traits so the session logic does not care whether it is
//! driving a mapping SDK, a terminal, or the in-memory doubles in
//! [`memory`].

pub mod error;
pub mod geocode;
pub mod memory;
pub mod model;
pub mod session;
pub mod surface;

pub use error::{GeocodeError, ViewError};
pub use geocode::{Geocoder, MemoryGeocoder, REVERSE_MATCH_RADIUS_MILES};
pub use memory::{MarkerHandle, MemoryList, MemoryMap};
pub use model::{
    distance_text, rating_text, ContactAction, DetailPanel, InfoContent, ListRow, ReviewView,
    StarRating,
};
pub use session::{MountOptions, ViewSession};
pub use surface::{ListSurface, MapSurface, MarkerKind, Notice};
