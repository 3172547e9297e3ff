use axum::extract::DefaultBodyLimit;
use facturasnap_rust::{api, AppConfig, ReceiptService, SuperAkiInvoicer, TesseractEngine};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, RUST_LOG 可覆盖级别
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建服务
    let ocr = Arc::new(TesseractEngine::new(config.ocr.clone()));
    let receipts = Arc::new(ReceiptService::new(ocr));
    let invoicer = Arc::new(SuperAkiInvoicer::new(&config.webdriver, &config.super_aki));
    info!("WebDriver endpoint: {}", config.webdriver.url);

    // 构建路由
    let app = api::routes(receipts, invoicer).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(config.server.body_limit_bytes)),
    );

    // 启动服务器
    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/obtener_folio        - receipt OCR (super-aki, bodega-aurrera)");
    info!("  POST /api/facturar_super-aki   - Super Aki invoice automation");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
