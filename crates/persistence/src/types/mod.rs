//! Request, settings and response types.

mod request;
mod response;
mod settings;

pub use request::{
    BatchPayload, FacetSelection, RawFilter, RawSearchRequest, RequestMode, SearchParams,
};
pub use response::{
    FacetHit, FacetSearchResponse, HighlightResult, Hit, MatchLevel, SearchOutcome,
    SearchResponse,
};
pub use settings::{
    ClientValidation, FacetDeclaration, FacetKind, IndexConfig, IndexConfigs, IndexSettings,
    SortFacetValuesBy,
};

pub(crate) use settings::allows;
