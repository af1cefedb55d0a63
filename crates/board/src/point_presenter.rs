//! View/edit lifecycle of one rendered point.

use shared::{
    domain::{requires_reorder, Destination, Offer, Point, PointId},
    protocol::{UpdateKind, UserAction, ViewAction},
};

use crate::view::{RenderPosition, ViewHandle, ViewHost, ViewNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Editing,
}

#[derive(Debug)]
pub struct PointPresenter {
    list: ViewHandle,
    point: Point,
    destination: Option<Destination>,
    available_offers: Vec<Offer>,
    handle: Option<ViewHandle>,
    mode: Mode,
}

impl PointPresenter {
    pub fn new(list: ViewHandle, point: Point) -> Self {
        Self {
            list,
            point,
            destination: None,
            available_offers: Vec::new(),
            handle: None,
            mode: Mode::View,
        }
    }

    pub fn id(&self) -> PointId {
        self.point.id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn handle(&self) -> Option<ViewHandle> {
        self.handle
    }

    /// Renders `point` in the current mode: mounts on first call, replaces in
    /// place afterwards.
    pub fn init(
        &mut self,
        host: &mut dyn ViewHost,
        point: Point,
        destination: Option<Destination>,
        available_offers: Vec<Offer>,
    ) {
        self.point = point;
        self.destination = destination;
        self.available_offers = available_offers;

        let node = self.node();
        match self.handle {
            Some(handle) => host.replace(handle, node),
            None => {
                self.handle = Some(host.mount(node, Some(self.list), RenderPosition::BeforeEnd));
            }
        }
    }

    /// VIEW -> EDITING. Returns false when already editing.
    pub fn request_edit(&mut self, host: &mut dyn ViewHost) -> bool {
        if self.mode == Mode::Editing {
            return false;
        }
        self.mode = Mode::Editing;
        self.rerender(host);
        true
    }

    /// EDITING -> VIEW, discarding whatever the form held.
    pub fn reset_view(&mut self, host: &mut dyn ViewHost) {
        if self.mode == Mode::View {
            return;
        }
        self.mode = Mode::View;
        self.rerender(host);
    }

    /// Closes the form and returns the update to apply. Edits that can move
    /// the row under some sort kind are sent as MINOR, the rest as PATCH.
    pub fn submit(&mut self, host: &mut dyn ViewHost, mut updated: Point) -> ViewAction {
        updated.id = self.point.id;
        let update = if requires_reorder(&self.point, &updated) {
            UpdateKind::Minor
        } else {
            UpdateKind::Patch
        };
        self.reset_view(host);
        ViewAction::new(UserAction::UpdatePoint, update, updated)
    }

    pub fn toggle_favorite(&self) -> ViewAction {
        let mut point = self.point.clone();
        point.is_favorite = !point.is_favorite;
        ViewAction::new(UserAction::UpdatePoint, UpdateKind::Patch, point)
    }

    pub fn delete(&self) -> ViewAction {
        ViewAction::new(UserAction::DeletePoint, UpdateKind::Minor, self.point.clone())
    }

    pub fn destroy(&mut self, host: &mut dyn ViewHost) {
        if let Some(handle) = self.handle.take() {
            host.unmount(handle);
        }
    }

    fn rerender(&self, host: &mut dyn ViewHost) {
        if let Some(handle) = self.handle {
            host.replace(handle, self.node());
        }
    }

    fn node(&self) -> ViewNode {
        match self.mode {
            Mode::View => ViewNode::PointCard {
                point: self.point.clone(),
                destination: self.destination.clone(),
                selected_offers: self
                    .available_offers
                    .iter()
                    .filter(|offer| self.point.offers.contains(&offer.id))
                    .cloned()
                    .collect(),
            },
            Mode::Editing => ViewNode::PointEditor {
                point: self.point.clone(),
                destination: self.destination.clone(),
                available_offers: self.available_offers.clone(),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/point_presenter_tests.rs"]
mod tests;
