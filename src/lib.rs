pub mod core;
pub mod fetchers;
pub mod http;
pub mod output;
pub mod stats;

pub use crate::core::{
    AutoRefresh, CommandView, Page, PageHandle, PollLoop, ProxyView, RefreshOutcome, Refresher,
    View, ViewError, ViewResult, ViewerConfig,
};
pub use fetchers::{Fetcher, HttpFetcher};
pub use http::{CommandRecord, FetchedResponse, ProxyRecord};
pub use output::{OutputSink, Renderer};
pub use stats::StatsTracker;
