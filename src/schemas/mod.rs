use serde::Deserialize;

pub(crate) mod classroom;
pub(crate) mod quiz;
pub(crate) mod user;

/// Error payload the backend sends with non-success statuses. `detail` is
/// usually a string but validation failures carry structured values.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) detail: serde_json::Value,
}
