//! llama.cpp CLI based summarizer.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::LlmConfig;

use super::error::SummarizerError;
use super::traits::Summarizer;

/// Generates summaries by shelling out to the llama.cpp CLI, streaming its
/// stdout as deltas.
pub struct LlamaCliSummarizer {
    config: LlmConfig,
}

impl LlamaCliSummarizer {
    /// Creates a new summarizer with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, prompt: &str) -> Vec<String> {
        let params = &self.config.params;
        // min_new_tokens and max_resample_eos have no llama-cli flags; they
        // apply to embedded backends that drive the decode loop themselves.
        vec![
            "-m".to_string(),
            self.config.model_path.to_string_lossy().to_string(),
            "-c".to_string(),
            params.n_ctx.to_string(),
            "-b".to_string(),
            params.n_batch.to_string(),
            "--top-k".to_string(),
            params.top_k.to_string(),
            "--top-p".to_string(),
            params.top_p.to_string(),
            "--temp".to_string(),
            params.temperature.to_string(),
            "-n".to_string(),
            params.max_new_tokens.to_string(),
            "--no-display-prompt".to_string(),
            "--simple-io".to_string(),
            "-p".to_string(),
            prompt.to_string(),
        ]
    }
}

impl Summarizer for LlamaCliSummarizer {
    fn name(&self) -> &str {
        "llama-cli"
    }

    fn summarize(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, SummarizerError> {
        if !self.config.model_path.exists() {
            return Err(SummarizerError::ModelNotFound {
                path: self.config.model_path.clone(),
            });
        }

        let args = self.build_args(prompt);
        debug!(
            "Running {} with model {:?}",
            self.config.llama_cli_path, self.config.model_path
        );

        let mut child = Command::new(&self.config.llama_cli_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SummarizerError::BinaryNotFound {
                        path: self.config.llama_cli_path.clone(),
                    }
                } else {
                    SummarizerError::Io(e)
                }
            })?;

        // Drain stderr on a helper thread so a chatty model load cannot fill
        // the pipe and deadlock the child.
        let mut stderr = child.stderr.take().expect("stderr should be captured");
        let stderr_handle = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let stdout = child.stdout.take().expect("stdout should be captured");
        let reader = BufReader::new(stdout);

        let mut out = String::new();
        for line in reader.lines() {
            let line = line?;
            on_delta(&line);
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&line);
        }

        let status = child.wait()?;
        let stderr_output = stderr_handle.join().unwrap_or_default();

        if !status.success() {
            return Err(SummarizerError::generation_failed(
                format!("llama-cli exited with code: {:?}", status.code()),
                if stderr_output.is_empty() {
                    None
                } else {
                    Some(stderr_output)
                },
            ));
        }

        Ok(out.trim().to_string())
    }
}
