// All prompt constants for the analysis module.
// Placeholders are `{name}` and are filled by `fill_template` in a single pass.

/// System prompt for boolean-string generation — plain text output.
pub const BOOLEAN_STRINGS_SYSTEM: &str = "\
You are a recruitment expert. \
Turn job descriptions into effective boolean search strings that recruiters can paste \
into sourcing platforms such as LinkedIn and Indeed. \
Respond with the boolean strings as plain text only.";

/// Boolean-string prompt template. Fill `{job_description}` before sending.
pub const BOOLEAN_STRINGS_PROMPT_TEMPLATE: &str =
    "Generate boolean search strings for this job description: {job_description}";

/// System prompt for resume relevancy scoring — JSON-only output.
pub const RELEVANCY_SYSTEM: &str = "\
You are a resume analysis expert. \
Compare a resume against boolean search strings and report a relevancy score, \
the keywords the resume contains, and the keywords it is missing. \
You MUST respond with valid JSON only. \
Do NOT use markdown code fences.";

/// Relevancy prompt template. Fill `{boolean_strings}` and `{resume_text}` before sending.
pub const RELEVANCY_PROMPT_TEMPLATE: &str = r#"Boolean strings: {boolean_strings}

Resume text: {resume_text}

Analyze the resume against these boolean strings. Return a JSON object with exactly these fields:
{ "score": integer from 0 to 100, "presentKeywords": array of strings, "missingKeywords": array of strings }"#;

/// Replaces each `{name}` placeholder with its value. Substituted text is never
/// rescanned, so user input containing `{...}` cannot reach another placeholder.
/// Unknown placeholders are left as written.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
