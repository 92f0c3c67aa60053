pub mod comfy;
pub mod fcm;
pub mod google_auth;
pub mod openai_batch;
pub mod sheets_client;
pub mod supabase;

pub use comfy::ComfyClient;
pub use fcm::FcmClient;
pub use google_auth::GoogleAuth;
pub use openai_batch::OpenAiBatchClient;
pub use sheets_client::SheetsClient;
pub use supabase::SupabaseClient;
