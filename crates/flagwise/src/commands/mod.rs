pub mod decide;
pub mod inspect;
pub mod perf;
pub mod version;

use flagwise_core::ClientBuilder;
use std::path::Path;

/// Builder loaded from the CDN when an SDK key is given, otherwise from `datafile`
pub(crate) fn load_datafile(datafile: &Path, sdk_key: Option<&str>) -> anyhow::Result<ClientBuilder> {
    let builder = match sdk_key {
        Some(sdk_key) => ClientBuilder::new().with_sdk_key(sdk_key)?,
        None => ClientBuilder::new().with_local_datafile(datafile)?,
    };
    Ok(builder)
}
