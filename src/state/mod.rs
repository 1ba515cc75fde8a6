// ============================================================================
// STATE MODULE - snapshot observable + eventos one-shot
// ============================================================================

pub mod events;
pub mod reactivity;
pub mod session_state;

pub use events::{EventQueue, RouteUiEvent};
pub use reactivity::ReactiveState;
pub use session_state::RouteUiState;
