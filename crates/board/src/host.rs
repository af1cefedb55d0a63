//! In-memory [`ViewHost`] keeping the live view tree and a log of every
//! mount, replace and unmount. Backs the CLI text output and the tests.

use std::{collections::HashMap, fmt::Write as _};

use tracing::warn;

use crate::view::{RenderPosition, ViewHandle, ViewHost, ViewNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Mounted { handle: ViewHandle, node: ViewNode },
    Replaced { handle: ViewHandle, node: ViewNode },
    Unmounted { handle: ViewHandle },
}

impl HostEvent {
    pub fn handle(&self) -> ViewHandle {
        match self {
            HostEvent::Mounted { handle, .. }
            | HostEvent::Replaced { handle, .. }
            | HostEvent::Unmounted { handle } => *handle,
        }
    }
}

#[derive(Debug)]
struct Slot {
    node: ViewNode,
    parent: Option<ViewHandle>,
    children: Vec<ViewHandle>,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    next_handle: u64,
    slots: HashMap<ViewHandle, Slot>,
    roots: Vec<ViewHandle>,
    events: Vec<HostEvent>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn node(&self, handle: ViewHandle) -> Option<&ViewNode> {
        self.slots.get(&handle).map(|slot| &slot.node)
    }

    pub fn is_mounted(&self, handle: ViewHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn mounted_count(&self) -> usize {
        self.slots.len()
    }

    pub fn roots(&self) -> &[ViewHandle] {
        &self.roots
    }

    pub fn children(&self, handle: ViewHandle) -> &[ViewHandle] {
        self.slots
            .get(&handle)
            .map(|slot| slot.children.as_slice())
            .unwrap_or_default()
    }

    /// Top-level nodes in board order.
    pub fn root_nodes(&self) -> Vec<&ViewNode> {
        self.roots.iter().filter_map(|h| self.node(*h)).collect()
    }

    /// Live nodes matching `predicate`, in tree order.
    pub fn find_all(&self, predicate: impl Fn(&ViewNode) -> bool) -> Vec<&ViewNode> {
        let mut found = Vec::new();
        let mut stack: Vec<ViewHandle> = self.roots.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(slot) = self.slots.get(&handle) else {
                continue;
            };
            if predicate(&slot.node) {
                found.push(&slot.node);
            }
            stack.extend(slot.children.iter().rev().copied());
        }
        found
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.write_node(&mut out, *root, 0);
        }
        out
    }

    fn write_node(&self, out: &mut String, handle: ViewHandle, depth: usize) {
        let Some(slot) = self.slots.get(&handle) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let line = describe(&slot.node);
        if !line.is_empty() {
            let _ = writeln!(out, "{indent}{line}");
        }
        for child in &slot.children {
            self.write_node(out, *child, depth + 1);
        }
    }

    fn drop_subtree(&mut self, handle: ViewHandle) {
        if let Some(slot) = self.slots.remove(&handle) {
            for child in slot.children {
                self.drop_subtree(child);
            }
        }
    }
}

impl ViewHost for MemoryHost {
    fn mount(
        &mut self,
        node: ViewNode,
        parent: Option<ViewHandle>,
        position: RenderPosition,
    ) -> ViewHandle {
        self.next_handle += 1;
        let handle = ViewHandle(self.next_handle);

        let parent = parent.filter(|p| {
            let known = self.slots.contains_key(p);
            if !known {
                warn!(parent = p.0, "mount under unknown parent, attaching to root");
            }
            known
        });
        let siblings = match parent.and_then(|p| self.slots.get_mut(&p)) {
            Some(slot) => &mut slot.children,
            None => &mut self.roots,
        };
        match position {
            RenderPosition::AfterBegin => siblings.insert(0, handle),
            RenderPosition::BeforeEnd => siblings.push(handle),
        }

        self.slots.insert(
            handle,
            Slot {
                node: node.clone(),
                parent,
                children: Vec::new(),
            },
        );
        self.events.push(HostEvent::Mounted { handle, node });
        handle
    }

    fn replace(&mut self, handle: ViewHandle, node: ViewNode) {
        let Some(slot) = self.slots.get_mut(&handle) else {
            warn!(handle = handle.0, "replace of unmounted view ignored");
            return;
        };
        slot.node = node.clone();
        self.events.push(HostEvent::Replaced { handle, node });
    }

    fn unmount(&mut self, handle: ViewHandle) {
        let Some(parent) = self.slots.get(&handle).map(|slot| slot.parent) else {
            return;
        };
        let siblings = match parent.and_then(|p| self.slots.get_mut(&p)) {
            Some(slot) => &mut slot.children,
            None => &mut self.roots,
        };
        siblings.retain(|h| *h != handle);
        self.drop_subtree(handle);
        self.events.push(HostEvent::Unmounted { handle });
    }
}

fn describe(node: &ViewNode) -> String {
    match node {
        ViewNode::SortBar { current } => {
            let labels: Vec<String> = shared::protocol::SortKind::ALL
                .into_iter()
                .map(|kind| {
                    if kind == *current {
                        format!("[{kind}]")
                    } else {
                        kind.to_string()
                    }
                })
                .collect();
            format!("sort: {}", labels.join(" "))
        }
        ViewNode::EmptyState { filter } => filter.empty_message().to_string(),
        ViewNode::EventList => String::new(),
        ViewNode::PointCard {
            point,
            destination,
            selected_offers,
        } => {
            let mut line = format!(
                "{} {}-{} {} {} ${}",
                point.date_from.format("%b %d"),
                point.date_from.format("%H:%M"),
                point.date_to.format("%H:%M"),
                point.point_type.as_str(),
                destination.as_ref().map_or("?", |d| d.name.as_str()),
                point.base_price,
            );
            for offer in selected_offers {
                let _ = write!(line, " +{} ${}", offer.title, offer.price);
            }
            if point.is_favorite {
                line.push_str(" *");
            }
            line
        }
        ViewNode::PointEditor {
            point,
            destination,
            available_offers,
        } => format!(
            "editing: {} {} ${} ({} offers available)",
            point.point_type.as_str(),
            destination.as_ref().map_or("?", |d| d.name.as_str()),
            point.base_price,
            available_offers.len(),
        ),
        ViewNode::NewPointForm(draft) => format!(
            "new point: {} ${}",
            draft.point_type.as_str(),
            draft.base_price
        ),
    }
}
