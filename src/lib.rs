pub mod annotation;
pub mod cli;
pub mod config;
pub mod query;
pub mod render;
pub mod sources;

pub use annotation::{build_annotations, Annotation, Annotations, PartialDate, SourceFile};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use render::render_table;
