pub mod classifier;
pub mod formatter;
pub mod render_model;
pub mod serializer;
