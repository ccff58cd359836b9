pub(crate) mod fetch;
pub(crate) mod list;
pub(crate) mod permissions;
pub(crate) mod progress;
pub(crate) mod tx;
