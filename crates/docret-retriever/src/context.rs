use docret_core::DocumentChunk;

/// Join chunk contents into one prompt-ready block.
///
/// Each chunk at 1-based position `i` becomes `"--- Document {i} ---\n{content}\n"`;
/// blocks are joined with a single newline. No chunks gives an empty string.
pub fn format_context(chunks: &[DocumentChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("--- Document {} ---\n{}\n", i + 1, chunk.content))
        .collect::<Vec<_>>()
        .join("\n")
}
