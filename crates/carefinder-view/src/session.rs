//! One view session per mount point.
//!
//! The session owns all view state: which providers are displayed, the
//! marker for each, the user marker, and the current selection. Every
//! [`ViewSession::populate`] resets provider state wholesale, so a result
//! set never mixes with the previous one.

use carefinder_core::{Bounds, Coordinate, ProviderRecord};

use crate::error::ViewError;
use crate::model::{DetailPanel, InfoContent, ListRow};
use crate::surface::{ListSurface, MapSurface, MarkerKind, Notice};

const EMPTY_MESSAGE: &str =
    "No therapists found in this area. Try expanding your search or changing the specialty.";
const LOCATION_NOT_FOUND_MESSAGE: &str =
    "We couldn't find that location. Please try again with a different search.";

/// Per-mount viewport tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountOptions {
    /// Pixels of padding when fitting results.
    pub fit_padding: u32,
    /// Zoom used when only one result is shown or the fit zoomed in too far.
    pub single_result_zoom: u8,
    /// Fits ending above this zoom are pulled back to `single_result_zoom`.
    pub max_fit_zoom: u8,
    /// Zoom applied when centring on the user.
    pub user_zoom: u8,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            fit_padding: 0,
            single_result_zoom: 13,
            max_fit_zoom: 15,
            user_zoom: 12,
        }
    }
}

impl MountOptions {
    /// The embedded panel on the landing page, which pads its fits.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            fit_padding: 50,
            ..Self::default()
        }
    }
}

struct DisplayedProvider<K> {
    record: ProviderRecord,
    marker: K,
}

pub struct ViewSession<M: MapSurface, L: ListSurface> {
    map: M,
    list: L,
    options: MountOptions,
    providers: Vec<DisplayedProvider<M::Marker>>,
    user: Option<(M::Marker, Coordinate)>,
    user_address: Option<String>,
    selected: Option<String>,
}

impl<M: MapSurface, L: ListSurface> ViewSession<M, L> {
    pub fn new(map: M, list: L, options: MountOptions) -> Self {
        Self {
            map,
            list,
            options,
            providers: Vec::new(),
            user: None,
            user_address: None,
            selected: None,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    pub fn options(&self) -> MountOptions {
        self.options
    }

    /// Id of the selected provider, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_record(&self) -> Option<&ProviderRecord> {
        let id = self.selected.as_deref()?;
        self.find(id).map(|i| &self.providers[i].record)
    }

    /// Displayed records in list order.
    pub fn records(&self) -> impl Iterator<Item = &ProviderRecord> {
        self.providers.iter().map(|p| &p.record)
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user.as_ref().map(|(_, position)| *position)
    }

    /// Human-readable address of the user's location, once known.
    pub fn user_address(&self) -> Option<&str> {
        self.user_address.as_deref()
    }

    /// Replaces the displayed result set and fits the map to it.
    ///
    /// Records repeating an id already displayed are skipped so each id maps
    /// to exactly one marker and one row. An empty set shows the empty
    /// notice.
    pub fn populate(&mut self, records: &[ProviderRecord]) {
        self.clear();

        if records.is_empty() {
            self.list.show_notice(&Notice::Empty {
                message: EMPTY_MESSAGE.to_string(),
            });
            return;
        }

        let mut bounds = Bounds::new();
        if let Some((_, position)) = &self.user {
            bounds.extend(*position);
        }

        for record in records {
            if self.find(&record.id).is_some() {
                tracing::warn!(id = %record.id, "skipping provider with duplicate id");
                continue;
            }
            let marker = self
                .map
                .add_marker(record.coordinate, MarkerKind::Provider, &record.name);
            self.list.append_row(&ListRow::from(record));
            bounds.extend(record.coordinate);
            self.providers.push(DisplayedProvider {
                record: record.clone(),
                marker,
            });
        }

        self.map.fit_bounds(&bounds, self.options.fit_padding);
        if self.providers.len() == 1 || self.map.zoom() > self.options.max_fit_zoom {
            self.map.set_zoom(self.options.single_result_zoom);
        }
        tracing::debug!(count = self.providers.len(), "view populated");
    }

    /// Selects the provider with `id`: highlights its marker and row, opens
    /// its popup, pans to it and shows the detail panel.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownProvider`] when `id` is not displayed. Nothing
    /// changes in that case.
    pub fn select(&mut self, id: &str) -> Result<(), ViewError> {
        let index = self.find(id).ok_or_else(|| ViewError::UnknownProvider {
            id: id.to_string(),
        })?;

        if let Some(prev) = self.selected.take() {
            if let Some(prev_index) = self.find(&prev) {
                self.map
                    .set_marker_active(&self.providers[prev_index].marker, false);
            }
            self.list.set_row_active(&prev, false);
        }
        self.map.close_all_info();

        let shown = &self.providers[index];
        self.map.set_marker_active(&shown.marker, true);
        self.list.set_row_active(&shown.record.id, true);
        self.map
            .open_info(&shown.marker, &InfoContent::from(&shown.record));
        self.map.pan_to(shown.record.coordinate);
        self.list.show_detail(&DetailPanel::from(&shown.record));

        self.selected = Some(shown.record.id.clone());
        Ok(())
    }

    /// Selects whichever provider owns `marker`.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownMarker`] when the marker is not a displayed
    /// provider's marker.
    pub fn select_marker(&mut self, marker: &M::Marker) -> Result<(), ViewError> {
        let id = self
            .providers
            .iter()
            .find(|p| &p.marker == marker)
            .map(|p| p.record.id.clone())
            .ok_or(ViewError::UnknownMarker)?;
        self.select(&id)
    }

    /// Hides the detail panel and clears the selection.
    pub fn close_detail(&mut self) {
        if let Some(prev) = self.selected.take() {
            if let Some(index) = self.find(&prev) {
                self.map
                    .set_marker_active(&self.providers[index].marker, false);
            }
            self.list.set_row_active(&prev, false);
        }
        self.map.close_all_info();
        self.list.hide_detail();
    }

    /// Places or moves the user marker and centres the map on it.
    ///
    /// Any address recorded for the previous position is dropped.
    pub fn set_user_location(&mut self, position: Coordinate) {
        self.user_address = None;
        match &mut self.user {
            Some((marker, current)) => {
                self.map.move_marker(marker, position);
                *current = position;
            }
            None => {
                let marker = self.map.add_marker(position, MarkerKind::User, "Your location");
                self.user = Some((marker, position));
            }
        }
        self.map.set_center(position);
        self.map.set_zoom(self.options.user_zoom);
    }

    /// Records the address for the current user location. Ignored while no
    /// user location is set.
    pub fn set_user_address(&mut self, address: impl Into<String>) {
        if self.user.is_some() {
            self.user_address = Some(address.into());
        }
    }

    /// Reports an address search that matched nothing. Displayed results
    /// stay in place.
    pub fn show_location_not_found(&mut self) {
        self.show_error(LOCATION_NOT_FOUND_MESSAGE);
    }

    pub fn show_loading(&mut self) {
        self.list.show_notice(&Notice::Loading);
    }

    /// Reports a failed search. Displayed results stay in place.
    pub fn show_error(&mut self, message: &str) {
        self.list.show_notice(&Notice::Error {
            message: message.to_string(),
        });
    }

    /// Clears displayed results and shows the empty notice.
    pub fn show_empty(&mut self) {
        self.populate(&[]);
    }

    fn clear(&mut self) {
        for shown in self.providers.drain(..) {
            self.map.remove_marker(&shown.marker);
        }
        self.map.close_all_info();
        self.list.clear();
        self.list.hide_detail();
        self.selected = None;
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.record.id == id)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
