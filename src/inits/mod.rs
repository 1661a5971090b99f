pub(crate) mod precomputed;
pub(crate) mod scalable;
