//! The OCR-then-summarize pipeline.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::extractor::TextExtractor;
use crate::metrics;
use crate::summarizer::Summarizer;

use super::error::PipelineError;
use super::prompt::build_prompt;
use super::traits::{CancelToken, Pipeline, ProgressSink};

/// Progress reported once extraction has finished.
const PROGRESS_EXTRACTED: u8 = 30;

/// Progress ceiling while generation deltas stream in; the worker owns the
/// jump to 100 at the terminal state.
const PROGRESS_GENERATION_CAP: u8 = 95;

/// Composes a [`TextExtractor`] and a [`Summarizer`] into the pipeline the
/// job manager runs.
pub struct OcrLlmPipeline<E: TextExtractor, G: Summarizer> {
    extractor: E,
    summarizer: G,
}

impl<E: TextExtractor, G: Summarizer> OcrLlmPipeline<E, G> {
    pub fn new(extractor: E, summarizer: G) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }
}

impl<E: TextExtractor, G: Summarizer> Pipeline for OcrLlmPipeline<E, G> {
    fn name(&self) -> &str {
        "ocr-llm"
    }

    fn run(
        &self,
        image_path: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<String, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        debug!("Extracting text from {:?}", image_path);
        let started = Instant::now();
        let text = self.extractor.extract(image_path)?;
        metrics::STAGE_DURATION
            .with_label_values(&["ocr"])
            .observe(started.elapsed().as_secs_f64());
        metrics::OCR_TEXT_LENGTH.observe(text.len() as f64);
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyExtraction);
        }
        progress.report(PROGRESS_EXTRACTED);

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let prompt = build_prompt(&text);
        debug!(
            "Extracted {} chars, generating summary with {}",
            text.len(),
            self.summarizer.name()
        );

        // Advance one percent per streamed delta, capped below the terminal
        // jump. Monotonic by construction.
        let started = Instant::now();
        let mut pct = PROGRESS_EXTRACTED;
        let summary = self.summarizer.summarize(&prompt, &mut |_delta| {
            if pct < PROGRESS_GENERATION_CAP {
                pct += 1;
            }
            progress.report(pct);
        })?;
        metrics::STAGE_DURATION
            .with_label_values(&["generate"])
            .observe(started.elapsed().as_secs_f64());

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        progress.report(PROGRESS_GENERATION_CAP);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractorError;
    use crate::summarizer::SummarizerError;
    use std::sync::Mutex;

    struct FixedExtractor(Result<String, &'static str>);

    impl TextExtractor for FixedExtractor {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract(&self, _image_path: &Path) -> Result<String, ExtractorError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(reason) => Err(ExtractorError::extraction_failed(*reason, None)),
            }
        }
    }

    struct EchoSummarizer {
        deltas: Vec<&'static str>,
    }

    impl Summarizer for EchoSummarizer {
        fn name(&self) -> &str {
            "echo"
        }

        fn summarize(
            &self,
            _prompt: &str,
            on_delta: &mut dyn FnMut(&str),
        ) -> Result<String, SummarizerError> {
            let mut out = String::new();
            for delta in &self.deltas {
                on_delta(delta);
                out.push_str(delta);
            }
            Ok(out)
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<u8>>);

    impl ProgressSink for RecordingSink {
        fn report(&self, pct: u8) {
            self.0.lock().unwrap().push(pct);
        }
    }

    #[test]
    fn test_pipeline_happy_path() {
        let pipeline = OcrLlmPipeline::new(
            FixedExtractor(Ok("some screenshot text".to_string())),
            EchoSummarizer {
                deltas: vec!["a ", "summary"],
            },
        );

        let sink = RecordingSink::default();
        let result = pipeline
            .run(Path::new("/tmp/shot.png"), &sink, &CancelToken::new())
            .unwrap();

        assert_eq!(result, "a summary");
        let reported = sink.0.lock().unwrap().clone();
        assert_eq!(reported.first(), Some(&PROGRESS_EXTRACTED));
        assert_eq!(reported.last(), Some(&PROGRESS_GENERATION_CAP));
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_pipeline_empty_extraction_fails() {
        let pipeline = OcrLlmPipeline::new(
            FixedExtractor(Ok("   \n".to_string())),
            EchoSummarizer { deltas: vec![] },
        );

        let result = pipeline.run(
            Path::new("/tmp/blank.png"),
            &RecordingSink::default(),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(PipelineError::EmptyExtraction)));
    }

    #[test]
    fn test_pipeline_extraction_error_propagates() {
        let pipeline = OcrLlmPipeline::new(
            FixedExtractor(Err("ocr failed")),
            EchoSummarizer { deltas: vec![] },
        );

        let result = pipeline.run(
            Path::new("/tmp/shot.png"),
            &RecordingSink::default(),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[test]
    fn test_pipeline_observes_cancellation() {
        let pipeline = OcrLlmPipeline::new(
            FixedExtractor(Ok("text".to_string())),
            EchoSummarizer { deltas: vec![] },
        );

        let cancel = CancelToken::new();
        cancel.cancel();
        let result = pipeline.run(Path::new("/tmp/shot.png"), &RecordingSink::default(), &cancel);
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }
}
