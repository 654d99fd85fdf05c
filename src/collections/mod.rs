// ABOUTME: Collection management view-models layered on the collections API

pub mod detail;
pub mod search;

pub use detail::{poster_source, BatchReport, CollectionDetailView};
pub use search::{SearchDebouncer, SearchOutcome, SearchView, DEFAULT_SEARCH_DEBOUNCE};
