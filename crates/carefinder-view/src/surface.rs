//! The two rendering surfaces a [`crate::ViewSession`] drives.

use carefinder_core::{Bounds, Coordinate};

use crate::model::{DetailPanel, InfoContent, ListRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Provider,
    /// The user's own position.
    User,
}

/// A map that can hold markers, popups and a viewport.
pub trait MapSurface {
    /// Opaque handle to a placed marker.
    type Marker: Clone + PartialEq + std::fmt::Debug;

    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind, title: &str) -> Self::Marker;
    fn move_marker(&mut self, marker: &Self::Marker, position: Coordinate);
    fn remove_marker(&mut self, marker: &Self::Marker);
    /// Highlights or un-highlights a marker.
    fn set_marker_active(&mut self, marker: &Self::Marker, active: bool);

    fn open_info(&mut self, marker: &Self::Marker, content: &InfoContent);
    fn close_all_info(&mut self);

    /// Fits the viewport to `bounds` with `padding` pixels on each side.
    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32);
    fn zoom(&self) -> u8;
    fn set_zoom(&mut self, zoom: u8);
    fn set_center(&mut self, position: Coordinate);
    /// Moves the viewport centre, animating where the surface can.
    fn pan_to(&mut self, position: Coordinate);
}

/// Non-result content shown in the list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Loading,
    /// A search failed; the surface should offer a retry.
    Error { message: String },
    Empty { message: String },
}

/// The result list and its detail panel.
pub trait ListSurface {
    /// Removes every row and notice.
    fn clear(&mut self);
    fn append_row(&mut self, row: &ListRow);
    fn set_row_active(&mut self, id: &str, active: bool);
    /// Shows a notice without touching existing rows.
    fn show_notice(&mut self, notice: &Notice);
    fn show_detail(&mut self, panel: &DetailPanel);
    fn hide_detail(&mut self);
}
