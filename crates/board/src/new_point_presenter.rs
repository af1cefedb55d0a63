//! Creation form lifecycle.

use chrono::{DateTime, Utc};
use shared::{
    domain::PointDraft,
    error::ModelError,
    protocol::{UpdateKind, UserAction, ViewAction},
};

use crate::view::{RenderPosition, ViewHandle, ViewHost, ViewNode};

pub struct NewPointPresenter {
    list: ViewHandle,
    draft: Option<PointDraft>,
    handle: Option<ViewHandle>,
    on_destroy: Box<dyn FnMut()>,
}

impl std::fmt::Debug for NewPointPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewPointPresenter")
            .field("list", &self.list)
            .field("draft", &self.draft)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl NewPointPresenter {
    /// `on_destroy` runs synchronously every time a mounted form goes away,
    /// so the owner of the "new event" control can enable it again.
    pub fn new(list: ViewHandle, on_destroy: impl FnMut() + 'static) -> Self {
        Self {
            list,
            draft: None,
            handle: None,
            on_destroy: Box::new(on_destroy),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    pub fn draft(&self) -> Option<&PointDraft> {
        self.draft.as_ref()
    }

    pub fn init(&mut self, host: &mut dyn ViewHost, now: DateTime<Utc>) {
        if self.handle.is_some() {
            return;
        }
        let draft = PointDraft::blank(now);
        self.handle = Some(host.mount(
            ViewNode::NewPointForm(draft.clone()),
            Some(self.list),
            RenderPosition::AfterBegin,
        ));
        self.draft = Some(draft);
    }

    pub fn edit(&mut self, host: &mut dyn ViewHost, change: impl FnOnce(&mut PointDraft)) {
        let (Some(handle), Some(draft)) = (self.handle, self.draft.as_mut()) else {
            return;
        };
        change(draft);
        host.replace(handle, ViewNode::NewPointForm(draft.clone()));
    }

    /// Validates the draft into an ADD action. The form stays mounted; the
    /// MAJOR notification that follows a successful insert tears it down.
    pub fn submit(&self) -> Result<ViewAction, ModelError> {
        let draft = self
            .draft
            .clone()
            .ok_or_else(|| ModelError::Validation("no point is being created".into()))?;
        let point = draft.into_point()?;
        Ok(ViewAction::new(UserAction::AddPoint, UpdateKind::Major, point))
    }

    pub fn destroy(&mut self, host: &mut dyn ViewHost) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        host.unmount(handle);
        self.draft = None;
        (self.on_destroy)();
    }
}

#[cfg(test)]
#[path = "tests/new_point_presenter_tests.rs"]
mod tests;
