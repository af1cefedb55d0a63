//! Seam between the presenters and whatever actually draws the board.

use shared::{
    domain::{Destination, Offer, Point, PointDraft},
    protocol::{FilterKind, SortKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    /// First child of the parent.
    AfterBegin,
    /// Last child of the parent.
    BeforeEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    SortBar {
        current: SortKind,
    },
    EmptyState {
        filter: FilterKind,
    },
    EventList,
    PointCard {
        point: Point,
        destination: Option<Destination>,
        selected_offers: Vec<Offer>,
    },
    PointEditor {
        point: Point,
        destination: Option<Destination>,
        available_offers: Vec<Offer>,
    },
    NewPointForm(PointDraft),
}

impl ViewNode {
    pub fn point(&self) -> Option<&Point> {
        match self {
            ViewNode::PointCard { point, .. } | ViewNode::PointEditor { point, .. } => Some(point),
            _ => None,
        }
    }
}

/// Mounts and unmounts visual nodes. `parent == None` targets the board
/// container itself. Unmounting a node also drops its children.
pub trait ViewHost {
    fn mount(
        &mut self,
        node: ViewNode,
        parent: Option<ViewHandle>,
        position: RenderPosition,
    ) -> ViewHandle;

    fn replace(&mut self, handle: ViewHandle, node: ViewNode);

    fn unmount(&mut self, handle: ViewHandle);
}
