mod config;
mod errors;
mod page;
mod poll;
mod refresher;
mod view;


pub use config::{CommandInfo, ProxyEntry, SelectedView, ViewerConfig};
pub use errors::{ViewError, ViewResult};
pub use page::{Page, PageHandle};
pub use poll::{AutoRefresh, PollLoop};
pub use refresher::{RefreshOutcome, Refresher};
pub use view::{CommandView, ProxyView, View};
