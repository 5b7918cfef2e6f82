pub(crate) mod layout;
pub(crate) mod scheduler;
pub(crate) mod tracker;
