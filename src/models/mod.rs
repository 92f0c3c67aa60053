pub mod batch;
pub mod content;
pub mod event;
pub mod loaders;
pub mod sheet;

pub use batch::{BatchOutputLine, BatchRequestLine, BatchStatus, RequestCounts};
pub use content::{GeneratedContent, ParsedResult};
pub use event::{EventContent, HistoricalEvent};
pub use loaders::load_events_toml;
pub use sheet::SheetRow;
