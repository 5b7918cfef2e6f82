pub(crate) mod composite;
pub(crate) mod fit;
pub(crate) mod renderer;
pub(crate) mod surface;
pub(crate) mod vignette;
