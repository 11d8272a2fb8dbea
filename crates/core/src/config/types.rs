use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory the web UI is served from
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_root: default_web_root(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

fn default_web_root() -> PathBuf {
    PathBuf::from("web")
}

/// Upload storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Directory uploaded images are written to before submission
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("/tmp/snapsum_upload")
}

/// OCR (text extraction) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrConfig {
    /// Path to the tesseract binary
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Recognition language passed to tesseract (`-l`)
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: default_tesseract_path(),
            language: default_ocr_language(),
        }
    }
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

/// LLM (summarization) configuration.
///
/// The sampling fields are an opaque bag handed to the summarizer; the job
/// manager never inspects them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Path to the llama.cpp CLI binary
    #[serde(default = "default_llama_cli_path")]
    pub llama_cli_path: String,
    /// Path to the GGUF model file
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub params: GenParams,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llama_cli_path: default_llama_cli_path(),
            model_path: default_model_path(),
            params: GenParams::default(),
        }
    }
}

fn default_llama_cli_path() -> String {
    "llama-cli".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/GGUF/qwen2.5-1.5b-instruct-q4_k_m.gguf")
}

/// Generation parameters passed through to the summarizer unexamined.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenParams {
    #[serde(default = "default_n_ctx")]
    pub n_ctx: u32,
    #[serde(default = "default_n_batch")]
    pub n_batch: u32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_min_new_tokens")]
    pub min_new_tokens: u32,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// How many times an early EOS may be resampled before giving up
    #[serde(default = "default_max_resample_eos")]
    pub max_resample_eos: u32,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            n_ctx: default_n_ctx(),
            n_batch: default_n_batch(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            temperature: default_temperature(),
            min_new_tokens: default_min_new_tokens(),
            max_new_tokens: default_max_new_tokens(),
            max_resample_eos: default_max_resample_eos(),
        }
    }
}

fn default_n_ctx() -> u32 {
    4096
}

fn default_n_batch() -> u32 {
    1024
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.90
}

fn default_temperature() -> f32 {
    0.40
}

fn default_min_new_tokens() -> u32 {
    160
}

fn default_max_new_tokens() -> u32 {
    800
}

fn default_max_resample_eos() -> u32 {
    64
}

/// Sanitized config for API responses (filesystem layout reduced to the
/// model file name)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub model: String,
    pub params: GenParams,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let model = config
            .llm
            .model_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            server: config.server.clone(),
            ocr: config.ocr.clone(),
            model,
            params: config.llm.params.clone(),
        }
    }
}
