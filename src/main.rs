use anyhow::Result;
use history_content_gen::orchestrator::App;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env
    dotenvy::dotenv().ok();

    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run().await?;

    Ok(())
}
