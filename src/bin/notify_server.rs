//! HTTP 服务入口（Cloud Run 部署）

use anyhow::Result;

use history_content_gen::server;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::from_env();
    server::serve(config).await?;

    Ok(())
}
