//! In-memory surfaces that record what a real surface would draw.

use carefinder_core::{Bounds, Coordinate};

use crate::model::{DetailPanel, InfoContent, ListRow};
use crate::surface::{ListSurface, MapSurface, MarkerKind, Notice};

/// Highest zoom level a fit may produce.
const MAX_ZOOM: u8 = 21;
const INITIAL_ZOOM: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub position: Coordinate,
    pub kind: MarkerKind,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMap {
    markers: Vec<PlacedMarker>,
    open_info: Option<(MarkerHandle, InfoContent)>,
    center: Option<Coordinate>,
    zoom: u8,
    last_fit_padding: Option<u32>,
    next_handle: u32,
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            open_info: None,
            center: None,
            zoom: INITIAL_ZOOM,
            last_fit_padding: None,
            next_handle: 0,
        }
    }
}

impl MemoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    pub fn active_markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.iter().filter(|m| m.active)
    }

    /// The marker whose popup is open, with its content.
    pub fn info_window(&self) -> Option<&(MarkerHandle, InfoContent)> {
        self.open_info.as_ref()
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    pub fn last_fit_padding(&self) -> Option<u32> {
        self.last_fit_padding
    }

    /// Handle of the provider marker placed at `position`, if any.
    pub fn marker_at(&self, position: Coordinate) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .find(|m| m.kind == MarkerKind::Provider && m.position == position)
            .map(|m| m.handle)
    }

    fn marker_mut(&mut self, handle: MarkerHandle) -> Option<&mut PlacedMarker> {
        self.markers.iter_mut().find(|m| m.handle == handle)
    }
}

/// Web-map style zoom: each level halves the visible span of 360 degrees.
// The level is clamped to 0..=MAX_ZOOM before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn zoom_for_span(span_deg: f64) -> u8 {
    if span_deg <= 0.0 || !span_deg.is_finite() {
        return MAX_ZOOM;
    }
    let level = (360.0 / span_deg).log2().floor();
    level.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

impl MapSurface for MemoryMap {
    type Marker = MarkerHandle;

    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind, title: &str) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.push(PlacedMarker {
            handle,
            position,
            kind,
            title: title.to_string(),
            active: false,
        });
        handle
    }

    fn move_marker(&mut self, marker: &MarkerHandle, position: Coordinate) {
        if let Some(m) = self.marker_mut(*marker) {
            m.position = position;
        }
    }

    fn remove_marker(&mut self, marker: &MarkerHandle) {
        self.markers.retain(|m| m.handle != *marker);
        if self.open_info.as_ref().is_some_and(|(h, _)| h == marker) {
            self.open_info = None;
        }
    }

    fn set_marker_active(&mut self, marker: &MarkerHandle, active: bool) {
        if let Some(m) = self.marker_mut(*marker) {
            m.active = active;
        }
    }

    fn open_info(&mut self, marker: &MarkerHandle, content: &InfoContent) {
        self.open_info = Some((*marker, content.clone()));
    }

    fn close_all_info(&mut self) {
        self.open_info = None;
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32) {
        let Some(center) = bounds.center() else {
            return;
        };
        let (lat_span, lng_span) = bounds.span().unwrap_or((0.0, 0.0));
        self.center = Some(center);
        self.zoom = zoom_for_span(lat_span.max(lng_span));
        self.last_fit_padding = Some(padding);
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.min(MAX_ZOOM);
    }

    fn set_center(&mut self, position: Coordinate) {
        self.center = Some(position);
    }

    fn pan_to(&mut self, position: Coordinate) {
        self.center = Some(position);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub row: ListRow,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryList {
    entries: Vec<ListEntry>,
    notice: Option<Notice>,
    detail: Option<DetailPanel>,
}

impl MemoryList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn active_rows(&self) -> impl Iterator<Item = &ListRow> {
        self.entries.iter().filter(|e| e.active).map(|e| &e.row)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }
}

impl ListSurface for MemoryList {
    fn clear(&mut self) {
        self.entries.clear();
        self.notice = None;
    }

    fn append_row(&mut self, row: &ListRow) {
        self.entries.push(ListEntry {
            row: row.clone(),
            active: false,
        });
    }

    fn set_row_active(&mut self, id: &str, active: bool) {
        for entry in self.entries.iter_mut().filter(|e| e.row.id == id) {
            entry.active = active;
        }
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.notice = Some(notice.clone());
    }

    fn show_detail(&mut self, panel: &DetailPanel) {
        self.detail = Some(panel.clone());
    }

    fn hide_detail(&mut self) {
        self.detail = None;
    }
}
