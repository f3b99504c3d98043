use tracing_subscriber::fmt::time::ChronoLocal;

/// 初始化日志 - 本地时间格式
pub fn init() {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();
}
