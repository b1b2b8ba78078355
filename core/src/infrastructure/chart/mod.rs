pub mod fonts;
pub mod plotters_renderer;
