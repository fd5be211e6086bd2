//! Prompt shaping for the voice interview flow.
//!
//! Résumé text arrives from PDF/plain-text extraction full of links,
//! handles and symbols. `clean_resume` flattens it to plain ASCII words
//! before it is embedded into the interview prompt.

/// Clean extracted résumé text.
///
/// Passes run in a fixed order; later passes see the output of earlier ones.
pub fn clean_resume(text: &str) -> String {
    let cleaned = drop_links(text);
    let cleaned = cleaned.replace("RT", " ").replace("cc", " ");
    let cleaned = drop_tagged_runs(&cleaned, '#', "");
    let cleaned = drop_tagged_runs(&cleaned, '@', " ");
    let cleaned: String = cleaned
        .chars()
        .map(|c| if c.is_ascii_punctuation() || !c.is_ascii() { ' ' } else { c })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Build the prompt sent to the completion provider for one interview turn.
pub fn interview_prompt(resume: &str, question: &str) -> String {
    format!(
        "I am conducting an interview. Here is the candidate's resume:\n{resume}\n\nInterviewer question: {question}"
    )
}

// "http" plus the rest of the token and any whitespace after it becomes one space.
fn drop_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("http") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        if !after[4..].starts_with(|c: char| !c.is_whitespace()) {
            // bare "http" with nothing attached is kept
            out.push_str("http");
            rest = &after[4..];
            continue;
        }
        out.push(' ');
        let token_end = after.find(char::is_whitespace).unwrap_or(after.len());
        let after = &after[token_end..];
        rest = after.trim_start_matches(char::is_whitespace);
    }
    out.push_str(rest);
    out
}

// `marker` followed by at least one non-whitespace char: the whole run is replaced.
fn drop_tagged_runs(text: &str, marker: char, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == marker && chars.peek().is_some_and(|next| !next.is_whitespace()) {
            while chars.peek().is_some_and(|next| !next.is_whitespace()) {
                chars.next();
            }
            out.push_str(replacement);
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
