//! Presenter layer of the trip board: keeps the rendered view tree in step with
//! the point collection and the active filter, and turns user interactions into
//! collection mutations.

pub mod board_presenter;
pub mod host;
pub mod new_point_presenter;
pub mod point_presenter;
pub mod view;

pub use board_presenter::BoardPresenter;
pub use host::{HostEvent, MemoryHost};
pub use new_point_presenter::NewPointPresenter;
pub use point_presenter::{Mode, PointPresenter};
pub use view::{RenderPosition, ViewHandle, ViewHost, ViewNode};
