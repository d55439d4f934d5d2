use anyhow::Result;
use stamp_submit::utils::logging;
use stamp_submit::{Action, App, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 解析动作与记录参数
    let mut args = std::env::args().skip(1);
    let Some(action_arg) = args.next() else {
        print_usage();
        return Ok(());
    };
    let Some(action) = Action::from_str(&action_arg) else {
        error!("未知动作: {}", action_arg);
        print_usage();
        return Ok(());
    };
    let record_arg = args.next();

    logging::log_startup(action.as_str());

    // 初始化并执行
    let app = App::initialize(config)?;
    let notification = app.run(action, record_arg.as_deref()).await;

    info!("📣 {}: {}", notification.title, notification.message);

    Ok(())
}

fn print_usage() {
    info!("用法: stamp_submit <动作> [申请单记录]");
    for action in Action::all() {
        info!("  {}", action.as_str());
    }
}
