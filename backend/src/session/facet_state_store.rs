//! The one mutable copy of the search state.
//!
//! Interaction handlers describe a change as a [`StateAction`] and hand it to
//! [`FacetStateStore::dispatch`]. Everything else reads immutable snapshots, so a
//! render cycle always sees the exact state its query was built from.

use std::sync::Arc;

use common::search_const::FALLBACK_PAGE_SIZE;
use common::search_query::{FacetConfig, FacetOrder, FacetState, FilterClause, FreetextClause, SortClause, ViewMode};
use tracing::debug;


#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    /// No-op on the filter set when an equal filter is already active.
    AddFilter(FilterClause),
    RemoveFilter(FilterClause),
    ClearFilters,
    /// Negative offsets clamp to 0. No upper bound: the pager disables "next" instead.
    SetPage(i64),
    NextPage,
    PreviousPage,
    /// 0 falls back to the default page size.
    SetPageSize(u64),
    SetSort(SortClause),
    /// Replaces the clause at `index`, appending when `index` is past the end.
    SetFreetextClause { index: usize, clause: FreetextClause },
    AddFreetextClause(FreetextClause),
    RemoveFreetextClause(usize),
    SetFacetSize { facet: String, size_limit: u64 },
    SetFacetOrder { facet: String, order: FacetOrder },
    SetFacetViewMode { facet: String, view_mode: ViewMode },
    /// Adds a facet, or replaces the config of one with the same name.
    AddFacet { facet: String, config: FacetConfig },
    /// Drops the facet's aggregation. Active filters on its field stay.
    RemoveFacet(String),
}

impl StateAction {
    /// Whether the action changes which records match, which invalidates the current page.
    fn resets_paging(&self) -> bool {
        matches!(
            self,
            Self::AddFilter(_)
                | Self::RemoveFilter(_)
                | Self::ClearFilters
                | Self::SetPageSize(_)
                | Self::SetSort(_)
                | Self::SetFreetextClause { .. }
                | Self::AddFreetextClause(_)
                | Self::RemoveFreetextClause(_)
                | Self::SetFacetOrder { .. }
                | Self::AddFacet { .. }
                | Self::RemoveFacet(_)
        )
    }
}

/// Applies one action to a state.
pub fn reduce(state: &mut FacetState, action: StateAction) {
    if action.resets_paging() {
        state.paging.offset = 0;
    }
    match action {
        StateAction::AddFilter(clause) => {
            if !state.contains_filter(&clause) {
                state.filters.push(clause);
            }
        }
        StateAction::RemoveFilter(clause) => state.filters.retain(|existing| existing != &clause),
        StateAction::ClearFilters => state.filters.clear(),
        StateAction::SetPage(offset) => state.paging.offset = offset.max(0) as u64,
        StateAction::NextPage => state.paging.offset = state.paging.offset.saturating_add(state.paging.page_size),
        StateAction::PreviousPage => state.paging.offset = state.paging.offset.saturating_sub(state.paging.page_size),
        StateAction::SetPageSize(page_size) => {
            state.paging.page_size = if page_size == 0 { FALLBACK_PAGE_SIZE } else { page_size };
        }
        StateAction::SetSort(sort) => state.sort = sort,
        StateAction::SetFreetextClause { index, clause } => match state.freetext_clauses.get_mut(index) {
            Some(existing) => *existing = clause,
            None => state.freetext_clauses.push(clause),
        },
        StateAction::AddFreetextClause(clause) => state.freetext_clauses.push(clause),
        StateAction::RemoveFreetextClause(index) => {
            if index < state.freetext_clauses.len() {
                state.freetext_clauses.remove(index);
            }
        }
        StateAction::SetFacetSize { facet, size_limit } => {
            if let Some(config) = state.facet_configs.get_mut(&facet) {
                config.size_limit = size_limit;
            }
        }
        StateAction::SetFacetOrder { facet, order } => {
            if let Some(config) = state.facet_configs.get_mut(&facet) {
                config.order = order;
            }
        }
        StateAction::SetFacetViewMode { facet, view_mode } => {
            if let Some(config) = state.facet_configs.get_mut(&facet) {
                config.view_mode = view_mode;
            }
        }
        StateAction::AddFacet { facet, config } => {
            state.facet_configs.insert(facet, config);
        }
        StateAction::RemoveFacet(facet) => {
            state.facet_configs.remove(&facet);
        }
    }
}


/// Copy-on-write holder of the session's facet state.
#[derive(Debug, Clone, Default)]
pub struct FacetStateStore {
    state: Arc<FacetState>,
}

impl FacetStateStore {
    pub fn new(state: FacetState) -> Self {
        Self { state: Arc::new(state) }
    }

    /// Immutable view of the current state; later dispatches do not affect it.
    pub fn snapshot(&self) -> Arc<FacetState> {
        self.state.clone()
    }

    pub fn state(&self) -> &FacetState {
        &self.state
    }

    pub fn dispatch(&mut self, action: StateAction) {
        debug!(?action, "facet state action");
        reduce(Arc::make_mut(&mut self.state), action);
    }

    pub fn add_filter(&mut self, clause: FilterClause) {
        self.dispatch(StateAction::AddFilter(clause));
    }

    pub fn remove_filter(&mut self, clause: FilterClause) {
        self.dispatch(StateAction::RemoveFilter(clause));
    }

    pub fn set_page(&mut self, offset: i64) {
        self.dispatch(StateAction::SetPage(offset));
    }

    pub fn set_sort(&mut self, sort: SortClause) {
        self.dispatch(StateAction::SetSort(sort));
    }

    pub fn set_freetext_clause(&mut self, index: usize, clause: FreetextClause) {
        self.dispatch(StateAction::SetFreetextClause { index, clause });
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use common::search_query::{BooleanRole, FacetKind, FieldSelector, SortDirection};

    use crate::api::search::build_query;

    fn store_on_page_three() -> FacetStateStore {
        let mut store = FacetStateStore::default();
        store.set_page(36);
        assert_eq!(store.state().paging.offset, 36);
        store
    }

    #[test]
    fn add_then_remove_restores_filters() {
        let mut store = FacetStateStore::default();
        store.add_filter(FilterClause::term("licenses", "MIT"));
        let before = store.state().filters.clone();

        let clause = FilterClause::date_bucket("date", 1_262_304_000_000);
        store.add_filter(clause.clone());
        store.remove_filter(clause);
        assert_eq!(store.state().filters, before);
    }

    #[test]
    fn duplicate_filter_is_kept_once() {
        let mut store = FacetStateStore::default();
        store.add_filter(FilterClause::term("licenses", "MIT"));
        store.add_filter(FilterClause::term("licenses", "MIT"));
        assert_eq!(store.state().filters.len(), 1);
    }

    #[test]
    fn filters_keep_insertion_order() {
        let mut store = FacetStateStore::default();
        store.add_filter(FilterClause::term("licenses", "MIT"));
        store.add_filter(FilterClause::term("collection", "cord-19"));
        store.add_filter(FilterClause::term("licenses", "BSD"));
        let fields = store.state().filters.iter().map(|f| f.field().to_string()).collect::<Vec<_>>();
        assert_eq!(fields, vec!["licenses", "collection", "licenses"]);
    }

    #[test]
    fn mutations_reset_paging() {
        let mut store = store_on_page_three();
        store.add_filter(FilterClause::term("licenses", "MIT"));
        assert_eq!(store.state().paging.offset, 0);

        let mut store = store_on_page_three();
        store.remove_filter(FilterClause::term("licenses", "MIT"));
        assert_eq!(store.state().paging.offset, 0);

        let mut store = store_on_page_three();
        store.set_sort(SortClause::new("number_documents", SortDirection::Desc));
        assert_eq!(store.state().paging.offset, 0);

        let mut store = store_on_page_three();
        store.set_freetext_clause(0, FreetextClause::new(FieldSelector::AllFields, BooleanRole::Must, "pandas"));
        assert_eq!(store.state().paging.offset, 0);

        let mut store = store_on_page_three();
        store.set_page(-12);
        assert_eq!(store.state().paging.offset, 0);
    }

    #[test]
    fn set_page_has_no_upper_clamp() {
        let mut store = FacetStateStore::default();
        store.set_page(1_000_000);
        assert_eq!(store.state().paging.offset, 1_000_000);
    }

    #[test]
    fn previous_page_clamps_at_zero() {
        let mut store = FacetStateStore::default();
        store.dispatch(StateAction::SetPageSize(10));
        store.set_page(5);
        store.dispatch(StateAction::PreviousPage);
        assert_eq!(store.state().paging.offset, 0);
        store.dispatch(StateAction::NextPage);
        store.dispatch(StateAction::NextPage);
        assert_eq!(store.state().paging.offset, 20);
    }

    #[test]
    fn zero_page_size_falls_back() {
        let mut store = FacetStateStore::default();
        store.dispatch(StateAction::SetPageSize(0));
        assert_eq!(store.state().paging.page_size, FALLBACK_PAGE_SIZE);
    }

    #[test]
    fn freetext_clause_replaced_or_appended() {
        let mut store = FacetStateStore::default();
        store.set_freetext_clause(0, FreetextClause::new(FieldSelector::AllFields, BooleanRole::Must, "pandas"));
        store.set_freetext_clause(5, FreetextClause::new(FieldSelector::field("authors"), BooleanRole::Should, "smith"));
        store.set_freetext_clause(0, FreetextClause::new(FieldSelector::AllFields, BooleanRole::Must, "numpy"));
        let clauses = &store.state().freetext_clauses;
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].text, "numpy");
        assert_eq!(clauses[1].text, "smith");

        store.dispatch(StateAction::RemoveFreetextClause(0));
        store.dispatch(StateAction::RemoveFreetextClause(9));
        assert_eq!(store.state().freetext_clauses.len(), 1);

        store.dispatch(StateAction::AddFreetextClause(FreetextClause::new(FieldSelector::AllFields, BooleanRole::MustNot, "java")));
        assert_eq!(store.state().freetext_clauses[1].role, BooleanRole::MustNot);
    }

    #[test]
    fn facet_settings_only_touch_known_facets() {
        let mut state = FacetState::default();
        state.facet_configs.insert("licenses".to_string(), FacetConfig::new("licenses", "licenses", 6, FacetKind::Plain));
        let mut store = FacetStateStore::new(state);
        store.dispatch(StateAction::SetFacetSize { facet: "licenses".to_string(), size_limit: 25 });
        store.dispatch(StateAction::SetFacetOrder { facet: "licenses".to_string(), order: FacetOrder::Term });
        store.dispatch(StateAction::SetFacetViewMode { facet: "licenses".to_string(), view_mode: ViewMode::Graphic });
        store.dispatch(StateAction::SetFacetSize { facet: "unknown".to_string(), size_limit: 25 });
        let config = &store.state().facet_configs["licenses"];
        assert_eq!(config.size_limit, 25);
        assert_eq!(config.order, FacetOrder::Term);
        assert_eq!(config.view_mode, ViewMode::Graphic);
        assert_eq!(store.state().facet_configs.len(), 1);
    }

    #[test]
    fn facets_added_and_removed_at_runtime() {
        let mut store = store_on_page_three();
        store.dispatch(StateAction::AddFacet {
            facet: "authors".to_string(),
            config: FacetConfig::new("authors.full_name", "authors", 6, FacetKind::Entity),
        });
        assert_eq!(store.state().paging.offset, 0);
        assert!(build_query(store.state())["aggs"]["authors"]["terms"].is_object());

        store.add_filter(FilterClause::term("authors.full_name", "Smith"));
        store.set_page(12);
        store.dispatch(StateAction::RemoveFacet("authors".to_string()));
        assert_eq!(store.state().paging.offset, 0);
        assert!(store.state().facet_configs.is_empty());
        assert_eq!(store.state().filters.len(), 1);
        assert!(build_query(store.state())["aggs"].as_object().unwrap().is_empty());
    }

    #[test]
    fn unbounded_facet_size_still_builds_a_query() {
        let mut state = FacetState::default();
        state.facet_configs.insert("licenses".to_string(), FacetConfig::new("licenses", "licenses", 6, FacetKind::Plain));
        let mut store = FacetStateStore::new(state);
        store.dispatch(StateAction::SetFacetSize { facet: "licenses".to_string(), size_limit: u64::MAX });
        let query = build_query(store.state());
        assert_eq!(query["aggs"]["licenses"]["terms"]["size"], serde_json::json!(u64::MAX));
    }

    #[test]
    fn snapshots_are_not_affected_by_later_dispatches() {
        let mut store = FacetStateStore::default();
        let before = store.snapshot();
        store.add_filter(FilterClause::term("licenses", "MIT"));
        assert!(before.filters.is_empty());
        assert_eq!(store.snapshot().filters.len(), 1);
    }
}
