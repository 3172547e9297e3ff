use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub webdriver: WebDriverConfig,
    pub super_aki: SuperAkiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体上限 (小票照片以 base64 上传)
    pub body_limit_bytes: usize,
}

/// Tesseract 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    pub tesseract_path: String,
    pub language: String,
    pub page_seg_mode: u8,
    pub char_whitelist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    /// chromedriver 等 WebDriver 服务地址
    pub url: String,
    pub chrome_args: Vec<String>,
    /// 同时存在的浏览器会话上限
    pub max_sessions: usize,
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperAkiConfig {
    pub form_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4545,
                body_limit_bytes: 50 * 1024 * 1024,
            },
            ocr: OcrConfig {
                tesseract_path: "/usr/bin/tesseract".to_string(),
                language: "spa".to_string(),
                page_seg_mode: 6,
                char_whitelist:
                    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#:".to_string(),
            },
            webdriver: WebDriverConfig {
                url: "http://localhost:9515".to_string(),
                chrome_args: vec![
                    "--no-sandbox".to_string(),
                    "--headless".to_string(),
                    "--disable-gpu".to_string(),
                    "--disable-dev-shm-usage".to_string(),
                    "--window-size=1920,1080".to_string(),
                ],
                max_sessions: 1,
                wait_timeout_ms: 10_000,
                poll_interval_ms: 500,
            },
            super_aki: SuperAkiConfig {
                form_url: "http://factura.superaki.mx/tickets/Paginas/FrmCapturaTicket.aspx"
                    .to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 内置默认值 < facturasnap.toml < FACTURASNAP_* 环境变量
    pub fn load() -> crate::Result<Self> {
        let builder = Config::builder()
            .add_source(File::with_name("facturasnap").required(false))
            .add_source(
                Environment::with_prefix("FACTURASNAP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("webdriver.chrome_args"),
            );
        Self::from_builder(builder)
    }

    /// 在默认值之上叠加给定的配置源
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> crate::Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())?;
        let settings = Config::builder()
            .add_source(defaults)
            .add_source(builder.build()?)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
