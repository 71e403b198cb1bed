//! The seam between a search session and whatever draws the results.

use std::sync::Arc;

use common::search_query::FacetState;
use common::search_result::{PageWindow, ResultSet, SnippetSpans};

use crate::session::request_sequencer::RequestTicket;


/// What the result panel should show for one applied search.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutcome {
    Results(ResultSet),
    /// The backend answered but nothing matched. Aggregations may still be present.
    Empty(ResultSet),
    Failed { message: String },
}

impl PanelOutcome {
    pub fn result(&self) -> Option<&ResultSet> {
        match self {
            Self::Results(result) | Self::Empty(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }
}

/// Everything a view needs to repaint after a search.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub ticket: RequestTicket,
    /// The snapshot the query was built from.
    pub state: Arc<FacetState>,
    pub outcome: PanelOutcome,
    pub window: PageWindow,
    /// Parallel to the result records.
    pub snippets: Vec<Vec<SnippetSpans>>,
}

pub trait RenderAdapter {
    fn render(&mut self, frame: RenderFrame);
}

/// Collects frames in order; handy for headless embedding.
impl RenderAdapter for Vec<RenderFrame> {
    fn render(&mut self, frame: RenderFrame) {
        self.push(frame);
    }
}
