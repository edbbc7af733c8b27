//! Scene data: descriptors, asset retrieval, instance binding, and the
//! small deterministic helpers the panels use for presentation.

pub mod carousel;
pub mod descriptor;
pub mod fetch;
pub mod matcher;
pub mod object_type;
pub mod relations;

pub use carousel::{SceneSummary, ThumbnailCarousel};
pub use descriptor::{ObjectInstance, SceneDescriptor};
pub use fetch::{
    discover_scenes, AssetSource, CatalogEntry, DirectorySource, LoadProgress, PreviewImage,
    SceneCatalog,
};
pub use matcher::{match_instance, BindingMap};
pub use object_type::{color_for, type_of};
pub use relations::{parse_relation, Relation, RelationEntry};
