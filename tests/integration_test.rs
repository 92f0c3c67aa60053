use std::path::Path;

use history_content_gen::models::load_events_toml;
use history_content_gen::orchestrator::App;
use history_content_gen::services::{BatchFileService, BatchService};
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_fill_single_sheet() {
    // 初始化日志
    logging::init();

    // 加载配置（需要 OPENAI_API_KEY 和 credentials.json）
    let config = Config::from_env();
    let sheet_name = config.sheet_name.clone();

    let app = App::initialize(config).await.expect("应用初始化失败");

    let stats = app
        .process_sheet(&sheet_name)
        .await
        .expect("工作表处理失败");

    println!(
        "处理 {} 行 / 跳过 {} 行 / 失败 {} 行",
        stats.processed, stats.skipped, stats.failed
    );
}

#[tokio::test]
#[ignore]
async fn test_generate_and_submit_batch() {
    logging::init();

    let config = Config::from_env();
    config.require_openai_key().expect("缺少 OPENAI_API_KEY");

    // 注意：请根据实际情况修改数据集路径
    let events = load_events_toml(Path::new("events.toml"))
        .await
        .expect("数据集加载失败");
    assert!(!events.is_empty(), "数据集不能为空");

    let file_service = BatchFileService::new(&config);
    let input_path = Path::new("batchinput.jsonl");
    file_service
        .generate(&events, input_path)
        .await
        .expect("批量输入文件生成失败");

    let batch_service = BatchService::new(&config);
    let batch = batch_service
        .submit(input_path, "Integration test batch")
        .await
        .expect("批量任务提交失败");

    println!("批量任务已创建: {}", batch.id);
    assert!(!batch.id.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_check_batch_status() {
    logging::init();

    let config = Config::from_env();
    config.require_openai_key().expect("缺少 OPENAI_API_KEY");

    // 注意：替换成真实的批量任务 ID
    let batch_id = std::env::var("TEST_BATCH_ID").expect("请设置 TEST_BATCH_ID");

    let service = BatchService::new(&config);
    let status = service.check_status(&batch_id).await.expect("状态查询失败");

    println!("批量状态: {}", status.status);
}
