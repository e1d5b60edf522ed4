use practice_grading::clients::{LmsClient, Session};
use practice_grading::config::Config;
use practice_grading::logger;
use practice_grading::models::load_all_drafts;
use practice_grading::{process_attempt, AssessmentFlow, PollPolicy};
use std::sync::Arc;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_submit_first_draft() {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();
    let session = Session::from_config(&config);

    let client = LmsClient::new(&config, session.clone()).expect("创建客户端失败");
    let flow = AssessmentFlow::new(Arc::new(client), PollPolicy::from_config(&config))
        .with_session(&session);

    let drafts = load_all_drafts(&config.draft_folder)
        .await
        .expect("加载草稿失败");
    let draft = drafts.into_iter().next().expect("草稿目录为空");

    let result = process_attempt(&flow, draft, 1, &config)
        .await
        .expect("处理答卷失败");

    assert!(result, "答卷应该提交成功");
}

#[tokio::test]
#[ignore]
async fn test_load_drafts() {
    logger::init();

    let config = Config::from_env();

    let result = load_all_drafts(&config.draft_folder).await;

    assert!(result.is_ok(), "应该能够加载草稿文件");

    let drafts = result.unwrap();
    println!("找到 {} 份答卷草稿", drafts.len());
}
