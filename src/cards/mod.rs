//! Card Interaction Coordinator: per-card view state, the grid, and the
//! operations users trigger on cards (expand, favorite, filter, sort,
//! select, context menu, share).

mod coordinator;
mod grid;
pub mod projection;
mod state;

pub use coordinator::{CardCoordinator, MenuAction};
pub use grid::CardGrid;
pub use state::{AppState, Card, CardContent, CardKey, CardView, Filters, Motion, Summary};
