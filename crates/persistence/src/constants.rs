//! Shared constants.

/// Prefix of every column the compiler adds to a row for its own use.
/// Columns carrying this prefix never reach a client.
pub const INTERNAL_COLUMN_PREFIX: &str = "postgres_searchbox_v1_";

/// Generated `tsvector` column holding the searchable document.
pub const VECTOR_COLUMN: &str = "postgres_searchbox_v1_doc";

/// Prefix of the per-attribute highlight columns; suffixed with the position
/// of the attribute in `attributesToHighlight`.
pub const HIGHLIGHT_COLUMN_PREFIX: &str = "postgres_searchbox_v1_highlight_";

/// Column carrying the position of a hit within its page.
pub const RANK_COLUMN: &str = "postgres_searchbox_v1_rank";

/// Maximum number of search requests in one batch.
pub const MAX_REQ_PER_HTTP_REQ: usize = 15;

/// Maximum hits per page (and maximum `length`).
pub const MAX_HITS_PER_PAGE: u32 = 100;

/// Maximum page number.
pub const MAX_PAGES: u32 = 100;

/// Maximum `offset + limit` a client may reach.
pub const MAX_HITS_TOTAL: u32 = 3000;

/// Maximum length of an index name, sort suffix included.
pub const MAX_INDEX_NAME_LENGTH: usize = 200;

/// Default highlight tags understood by InstantSearch.
pub const DEFAULT_HIGHLIGHT_PRE_TAG: &str = "__ais-highlight__";
/// See [`DEFAULT_HIGHLIGHT_PRE_TAG`].
pub const DEFAULT_HIGHLIGHT_POST_TAG: &str = "__/ais-highlight__";

/// Text search configuration used when settings do not name one.
pub const DEFAULT_LANGUAGE: &str = "english";
