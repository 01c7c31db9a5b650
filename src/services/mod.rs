pub mod icon_resolver;
pub mod live_preview;
pub mod override_editor;
pub mod override_store;
pub mod render_model;

pub use icon_resolver::IconResolver;
pub use live_preview::{LivePreviewController, PreviewOptions};
pub use override_editor::{IconChoice, OverrideEditor};
pub use override_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, OverrideStore};
pub use render_model::{ChampionCard, NullView, ReasonTag, RenderModel, ResultView};
