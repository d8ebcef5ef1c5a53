//! Feature flag decisions: client, user contexts, bucketing and decide options

mod bucketing;
mod builder;
mod client;
mod decide_options;
mod decision;
mod error;
mod user_context;

pub use bucketing::{bucket_value, MAX_TRAFFIC_VALUE};
pub use builder::{datafile_url, ClientBuilder};
pub use client::Client;
pub use decide_options::{DecideOptions, UnknownDecideOption};
pub use decision::{Decision, OFF_VARIATION};
pub use error::ClientError;
pub use flagwise_datafile::{AttributeValue, UserAttributes};
pub use user_context::UserContext;

/// Build [`UserAttributes`] from `key => value` pairs
///
/// ```
/// let attributes = flagwise_core::user_attributes! {
///     "is_employee" => true,
///     "app_version" => "1.3.2",
/// };
/// assert_eq!(attributes.len(), 2);
/// ```
#[macro_export]
macro_rules! user_attributes {
    () => {
        $crate::UserAttributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut attributes = $crate::UserAttributes::new();
        $(
            attributes.insert(
                ::std::string::String::from($key),
                $crate::AttributeValue::from($value),
            );
        )+
        attributes
    }};
}
