//! The board: derives the visible list from the models, owns one presenter per
//! rendered point plus the creation form, and reconciles them on every model
//! notification.
//!
//! Reconciliation cost follows the notification granularity:
//!
//! - `Patch` re-renders the single presenter for the changed point in place.
//! - `Minor` tears down every presenter and renders the derived list again.
//! - `Major` does the same after resetting the sort to [`SortKind::Default`].
//!
//! Edit focus is tracked in one place (`editing`): before any presenter enters
//! editing or the creation form mounts, the form is destroyed and the focused
//! presenter, if any, is reset to view mode.
//!
//! The owner's form-closed callback never runs while the board is borrowed, so
//! it may call back into the board.

use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    collections::HashMap,
    rc::Rc,
};

use models::{FilterModel, PointsModel, Subscription};
use shared::{
    domain::{Point, PointDraft, PointId},
    error::ModelError,
    filter::filter_points,
    protocol::{FilterKind, SortKind, UpdateKind, UserAction, ViewAction},
    sort::sort_points,
    time::Clock,
};
use tracing::{debug, info, warn};

use crate::{
    new_point_presenter::NewPointPresenter,
    point_presenter::{Mode, PointPresenter},
    view::{RenderPosition, ViewHandle, ViewHost, ViewNode},
};

#[derive(Clone)]
struct Context {
    points_model: Rc<PointsModel>,
    filter_model: Rc<FilterModel>,
    clock: Rc<dyn Clock>,
    form_closed: Rc<FormClosed>,
}

/// Creation-form closes are counted while the board is borrowed and reported
/// to the owner once the borrow is gone, so the owner may query the board.
struct FormClosed {
    pending: Cell<usize>,
    callback: RefCell<Box<dyn FnMut()>>,
}

impl FormClosed {
    fn record(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    fn flush(&self) {
        while self.pending.get() > 0 {
            // Already running further up the stack; that loop drains the rest.
            let Ok(mut callback) = self.callback.try_borrow_mut() else {
                return;
            };
            self.pending.set(self.pending.get() - 1);
            callback();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ModelEvent<'a> {
    Point(&'a Point),
    Filter(FilterKind),
}

struct BoardState<H> {
    host: H,
    list: ViewHandle,
    sort_bar: Option<ViewHandle>,
    empty_state: Option<ViewHandle>,
    point_presenters: HashMap<PointId, PointPresenter>,
    order: Vec<PointId>,
    new_point: NewPointPresenter,
    sort: SortKind,
    filter: FilterKind,
    editing: Option<PointId>,
}

impl<H: ViewHost> BoardState<H> {
    fn derived_points(&mut self, ctx: &Context) -> Vec<Point> {
        self.filter = ctx.filter_model.filter();
        let all = ctx.points_model.points();
        let mut points = filter_points(self.filter, &all, ctx.clock.now());
        sort_points(self.sort, &mut points);
        points
    }

    fn render_board(&mut self, ctx: &Context) {
        let points = self.derived_points(ctx);
        debug!(
            count = points.len(),
            filter = %self.filter,
            sort = %self.sort,
            "rendering board"
        );

        if points.is_empty() {
            self.empty_state = Some(self.host.mount(
                ViewNode::EmptyState {
                    filter: self.filter,
                },
                None,
                RenderPosition::AfterBegin,
            ));
            return;
        }

        self.sort_bar = Some(self.host.mount(
            ViewNode::SortBar { current: self.sort },
            None,
            RenderPosition::AfterBegin,
        ));
        for point in points {
            self.render_point(ctx, point);
        }
    }

    fn render_point(&mut self, ctx: &Context, point: Point) {
        let id = point.id;
        let destination = ctx.points_model.destination(point.destination).cloned();
        let offers = ctx.points_model.offers_for(point.point_type).to_vec();

        let mut presenter = PointPresenter::new(self.list, point.clone());
        presenter.init(&mut self.host, point, destination, offers);
        if let Some(mut stale) = self.point_presenters.insert(id, presenter) {
            warn!(point_id = %id, "duplicate point in derived list, dropping older view");
            stale.destroy(&mut self.host);
            self.order.retain(|rendered| *rendered != id);
        }
        self.order.push(id);
    }

    fn patch_point(&mut self, ctx: &Context, point: &Point) {
        let Some(presenter) = self.point_presenters.get_mut(&point.id) else {
            debug!(point_id = %point.id, "patch for point without a presenter ignored");
            return;
        };
        let destination = ctx.points_model.destination(point.destination).cloned();
        let offers = ctx.points_model.offers_for(point.point_type).to_vec();
        presenter.init(&mut self.host, point.clone(), destination, offers);
    }

    fn clear_board(&mut self, reset_sort: bool) {
        self.new_point.destroy(&mut self.host);
        for (_, mut presenter) in self.point_presenters.drain() {
            presenter.destroy(&mut self.host);
        }
        self.order.clear();
        self.editing = None;

        if let Some(handle) = self.sort_bar.take() {
            self.host.unmount(handle);
        }
        if let Some(handle) = self.empty_state.take() {
            self.host.unmount(handle);
        }
        if reset_sort {
            self.sort = SortKind::Default;
        }
    }

    fn handle_mode_change(&mut self) {
        self.new_point.destroy(&mut self.host);
        if let Some(id) = self.editing.take() {
            if let Some(presenter) = self.point_presenters.get_mut(&id) {
                presenter.reset_view(&mut self.host);
            }
        }
    }

    fn handle_model_event(&mut self, ctx: &Context, update: UpdateKind, event: ModelEvent<'_>) {
        debug!(?update, ?event, "model event");
        if let ModelEvent::Filter(filter) = event {
            debug!(from = %self.filter, to = %filter, "filter switched");
        }
        match (update, event) {
            (UpdateKind::Patch, ModelEvent::Point(point)) => self.patch_point(ctx, point),
            // A filter switch has no single row to patch.
            (UpdateKind::Patch | UpdateKind::Minor, _) => {
                self.clear_board(false);
                self.render_board(ctx);
            }
            (UpdateKind::Major, _) => {
                self.clear_board(true);
                self.render_board(ctx);
            }
        }
    }
}

pub struct BoardPresenter<H: ViewHost + 'static> {
    state: Rc<RefCell<BoardState<H>>>,
    ctx: Context,
    _subscriptions: [Subscription; 2],
}

impl<H: ViewHost + 'static> BoardPresenter<H> {
    /// Mounts the (initially empty) event list and subscribes to both models.
    /// Nothing else is rendered until [`BoardPresenter::init`].
    pub fn new(
        mut host: H,
        points_model: Rc<PointsModel>,
        filter_model: Rc<FilterModel>,
        clock: Rc<dyn Clock>,
        on_new_point_destroy: impl FnMut() + 'static,
    ) -> Self {
        let list = host.mount(ViewNode::EventList, None, RenderPosition::BeforeEnd);
        let form_closed = Rc::new(FormClosed {
            pending: Cell::new(0),
            callback: RefCell::new(Box::new(on_new_point_destroy)),
        });
        let state = Rc::new(RefCell::new(BoardState {
            host,
            list,
            sort_bar: None,
            empty_state: None,
            point_presenters: HashMap::new(),
            order: Vec::new(),
            new_point: NewPointPresenter::new(list, {
                let form_closed = Rc::clone(&form_closed);
                move || form_closed.record()
            }),
            sort: SortKind::Default,
            filter: filter_model.filter(),
            editing: None,
        }));
        let ctx = Context {
            points_model,
            filter_model,
            clock,
            form_closed,
        };

        let points_subscription = {
            let state = Rc::downgrade(&state);
            let ctx = ctx.clone();
            ctx.points_model
                .clone()
                .add_observer(move |update, point: &Point| {
                    if let Some(state) = state.upgrade() {
                        state
                            .borrow_mut()
                            .handle_model_event(&ctx, update, ModelEvent::Point(point));
                    }
                    ctx.form_closed.flush();
                })
        };
        let filter_subscription = {
            let state = Rc::downgrade(&state);
            let ctx = ctx.clone();
            ctx.filter_model
                .clone()
                .add_observer(move |update, filter: &FilterKind| {
                    if let Some(state) = state.upgrade() {
                        state
                            .borrow_mut()
                            .handle_model_event(&ctx, update, ModelEvent::Filter(*filter));
                    }
                    ctx.form_closed.flush();
                })
        };

        Self {
            state,
            ctx,
            _subscriptions: [points_subscription, filter_subscription],
        }
    }

    /// Renders the board from the models. Calling it again rebuilds the
    /// board from scratch, keeping the sort.
    pub fn init(&self) {
        info!(points = self.ctx.points_model.len(), "initializing board");
        {
            let mut state = self.state.borrow_mut();
            state.clear_board(false);
            state.render_board(&self.ctx);
        }
        self.ctx.form_closed.flush();
    }

    /// The filtered, sorted list the board shows.
    pub fn points(&self) -> Vec<Point> {
        self.state.borrow_mut().derived_points(&self.ctx)
    }

    /// Opens the creation form with the filter and sort reset, so the new
    /// point is visible whatever the user had selected.
    pub fn create_point(&self) {
        self.state.borrow_mut().sort = SortKind::Default;
        self.ctx
            .filter_model
            .set_filter(UpdateKind::Major, FilterKind::Everything);

        let now = self.ctx.clock.now();
        {
            let mut state = self.state.borrow_mut();
            state.handle_mode_change();
            let BoardState {
                host, new_point, ..
            } = &mut *state;
            new_point.init(host, now);
        }
        self.ctx.form_closed.flush();
    }

    pub fn sort_changed(&self, sort: SortKind) {
        {
            let mut state = self.state.borrow_mut();
            if state.sort == sort {
                return;
            }
            state.sort = sort;
            state.clear_board(false);
            state.render_board(&self.ctx);
        }
        self.ctx.form_closed.flush();
    }

    /// Puts the point's presenter into editing. Returns false when the point
    /// is not rendered or already owns edit focus.
    pub fn edit_point(&self, id: PointId) -> bool {
        let entered = self.enter_edit(id);
        self.ctx.form_closed.flush();
        entered
    }

    fn enter_edit(&self, id: PointId) -> bool {
        let mut state = self.state.borrow_mut();
        if state.editing == Some(id) {
            return false;
        }
        if !state.point_presenters.contains_key(&id) {
            warn!(point_id = %id, "edit requested for point that is not rendered");
            return false;
        }

        state.handle_mode_change();
        let BoardState {
            host,
            point_presenters,
            editing,
            ..
        } = &mut *state;
        let Some(presenter) = point_presenters.get_mut(&id) else {
            return false;
        };
        if presenter.request_edit(host) {
            *editing = Some(id);
        }
        true
    }

    pub fn cancel_edit(&self, id: PointId) {
        let mut state = self.state.borrow_mut();
        if state.editing != Some(id) {
            return;
        }
        state.editing = None;
        let BoardState {
            host,
            point_presenters,
            ..
        } = &mut *state;
        if let Some(presenter) = point_presenters.get_mut(&id) {
            presenter.reset_view(host);
        }
    }

    pub fn submit_point(&self, id: PointId, updated: Point) -> Result<(), ModelError> {
        let action = {
            let mut state = self.state.borrow_mut();
            if state.editing != Some(id) {
                warn!(point_id = %id, "submit for point that is not being edited ignored");
                return Ok(());
            }
            state.editing = None;
            let BoardState {
                host,
                point_presenters,
                ..
            } = &mut *state;
            let Some(presenter) = point_presenters.get_mut(&id) else {
                return Ok(());
            };
            presenter.submit(host, updated)
        };
        self.handle_view_action(action)
    }

    pub fn toggle_favorite(&self, id: PointId) -> Result<(), ModelError> {
        let action = self
            .state
            .borrow()
            .point_presenters
            .get(&id)
            .map(PointPresenter::toggle_favorite);
        match action {
            Some(action) => self.handle_view_action(action),
            None => {
                warn!(point_id = %id, "favorite toggle for point that is not rendered");
                Ok(())
            }
        }
    }

    pub fn delete_point(&self, id: PointId) -> Result<(), ModelError> {
        let action = self
            .state
            .borrow()
            .point_presenters
            .get(&id)
            .map(PointPresenter::delete);
        match action {
            Some(action) => self.handle_view_action(action),
            None => {
                warn!(point_id = %id, "delete for point that is not rendered");
                Ok(())
            }
        }
    }

    pub fn edit_new_point(&self, change: impl FnOnce(&mut PointDraft)) {
        let mut state = self.state.borrow_mut();
        let BoardState {
            host, new_point, ..
        } = &mut *state;
        new_point.edit(host, change);
    }

    /// Submits the creation form. An invalid draft leaves the form open.
    pub fn submit_new_point(&self) -> Result<(), ModelError> {
        let action = self.state.borrow().new_point.submit()?;
        self.handle_view_action(action)
    }

    pub fn cancel_new_point(&self) {
        {
            let mut state = self.state.borrow_mut();
            let BoardState {
                host, new_point, ..
            } = &mut *state;
            new_point.destroy(host);
        }
        self.ctx.form_closed.flush();
    }

    /// Forwards a presenter action to the matching collection mutator. The
    /// board does no validation of its own; a refused mutation is logged and
    /// leaves the board untouched.
    pub fn handle_view_action(&self, action: ViewAction) -> Result<(), ModelError> {
        let ViewAction {
            action,
            update,
            point,
        } = action;
        let id = point.id;
        let model = &self.ctx.points_model;
        let result = match action {
            UserAction::UpdatePoint => model.update_point(update, point),
            UserAction::AddPoint => model.add_point(update, point),
            UserAction::DeletePoint => model.delete_point(update, point),
        };
        if let Err(err) = &result {
            warn!(point_id = %id, ?action, ?update, error = %err, "point mutation rejected");
        }
        result
    }

    pub fn sort_kind(&self) -> SortKind {
        self.state.borrow().sort
    }

    pub fn filter_kind(&self) -> FilterKind {
        self.state.borrow().filter
    }

    /// Point currently owning edit focus.
    pub fn editing(&self) -> Option<PointId> {
        self.state.borrow().editing
    }

    pub fn is_creating(&self) -> bool {
        self.state.borrow().new_point.is_mounted()
    }

    pub fn new_point_draft(&self) -> Option<PointDraft> {
        self.state.borrow().new_point.draft().cloned()
    }

    /// Ids of rendered points in display order.
    pub fn rendered_ids(&self) -> Vec<PointId> {
        self.state.borrow().order.clone()
    }

    pub fn presenter_mode(&self, id: PointId) -> Option<Mode> {
        self.state
            .borrow()
            .point_presenters
            .get(&id)
            .map(PointPresenter::mode)
    }

    pub fn presenter_handle(&self, id: PointId) -> Option<ViewHandle> {
        self.state
            .borrow()
            .point_presenters
            .get(&id)
            .and_then(PointPresenter::handle)
    }

    pub fn has_sort_bar(&self) -> bool {
        self.state.borrow().sort_bar.is_some()
    }

    pub fn has_empty_state(&self) -> bool {
        self.state.borrow().empty_state.is_some()
    }

    pub fn event_list(&self) -> ViewHandle {
        self.state.borrow().list
    }

    pub fn host(&self) -> Ref<'_, H> {
        Ref::map(self.state.borrow(), |state| &state.host)
    }

    pub fn host_mut(&self) -> RefMut<'_, H> {
        RefMut::map(self.state.borrow_mut(), |state| &mut state.host)
    }
}

#[cfg(test)]
#[path = "tests/board_presenter_tests.rs"]
mod tests;
