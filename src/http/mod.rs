pub(crate) mod record;
pub(crate) mod response;

pub use record::{CommandRecord, ProxyInfo, ProxyRecord};
pub use response::FetchedResponse;
