//! Prompt template for context-grounded answers

use crate::rag::context::AssembledContext;

/// Shown in place of the context when no article could be used
pub const NO_CONTEXT_NOTE: &str = "(No Wikipedia articles were available for this question.)";

/// Build the text sent to the generator
///
/// Pure: the same question and context always produce the same prompt. The
/// question and the context text each appear verbatim.
pub fn build_prompt(question: &str, context: &AssembledContext) -> String {
    let context_text = if context.is_empty() {
        NO_CONTEXT_NOTE
    } else {
        context.text.as_str()
    };

    format!(
        "Based on the following Wikipedia articles, answer this question: {question}\n\
         \n\
         Context:\n\
         {context_text}\n\
         \n\
         Answer the question based on the context provided. \
         If the context doesn't contain enough information, say so.\n\
         \n\
         Answer:"
    )
}
