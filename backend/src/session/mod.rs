//! Per-page search session: state store, request sequencing and rendering.

pub mod facet_state_store;
pub use facet_state_store::{FacetStateStore, StateAction};

pub mod request_sequencer;
pub use request_sequencer::{RequestSequencer, RequestTicket};

pub mod render_adapter;
pub use render_adapter::{PanelOutcome, RenderAdapter, RenderFrame};

mod search_session;
pub use search_session::{PendingSearch, SearchSession, SearchStatus};
