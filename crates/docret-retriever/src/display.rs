//! Console rendering of detailed results, for interactive debugging.

use docret_core::DetailedResult;

const RULE_WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 200;

pub fn render_results(query: &str, k: usize, results: &[DetailedResult]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\nSearching for: '{query}'\nRetrieving top {k} results...\n{rule}\n\n");

    if results.is_empty() {
        out.push_str("No results found. Is the index empty?\n");
        return out;
    }

    let divider = "-".repeat(RULE_WIDTH - 4);
    for r in results {
        out.push_str(&format!(
            "Result #{}\n  Source: {}\n  Page: {}\n  Score: {} (lower = better match)\n  Content preview: {}...\n  {divider}\n",
            r.rank,
            r.source,
            r.page,
            r.score,
            preview(&r.content),
        ));
    }
    out.push_str(&format!("\nFound {} relevant document(s)\n", results.len()));
    out
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &content[..end],
        None => content,
    }
}
