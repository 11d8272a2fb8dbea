//! Summarization prompt construction.

/// Build the chat-template prompt for summarizing OCR output.
///
/// Two paragraphs are requested: a summary of the recognized text, then
/// related background. The template matches the Qwen instruct format the
/// default model ships with.
pub fn build_prompt(ocr_text: &str) -> String {
    format!(
        "<|im_start|>system\n\
         You are a precise technical assistant. Produce exactly two \
         paragraphs: first a summary of the screenshot text (one paragraph, \
         no bullet points), then related background knowledge (one \
         paragraph, no bullet points). No headings, no questions, no \
         instructions.\n\
         <|im_end|>\n\
         <|im_start|>user\n\
         The following text was recognized from a screenshot via OCR. \
         Summarize it and add background.\n\n\
         {ocr_text}\n\
         <|im_end|>\n\
         <|im_start|>assistant\n"
    )
}
