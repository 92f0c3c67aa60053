pub mod batch_file;
pub mod batch_service;
pub mod comfy_service;
pub mod llm_service;
pub mod parser;
pub mod prompts;
pub mod sheet_filler;
pub mod sheets_updater;
pub mod workflow_template;

pub use batch_file::BatchFileService;
pub use batch_service::BatchService;
pub use comfy_service::ComfyService;
pub use llm_service::LlmService;
pub use sheets_updater::SheetsUpdaterService;
