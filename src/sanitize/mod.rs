use regex::Regex;
use std::sync::OnceLock;

/// Line prefixes recognized as FreeCAD scripting vocabulary. A line starting
/// with none of these still passes if it carries an `=` or `(` (statement
/// evidence); otherwise it is treated as conversational prose.
///
/// Superset of the allow-lists shipped in both historical variants of the
/// cleaner; keep it that way when extending.
const CODE_PREFIXES: &[&str] = &[
    "#", "import", "from", "doc", "obj", "Part", "App", "FreeCAD", "Gui", "Mesh",
];

/// Constructs that must never reach the flat script: function/class
/// definitions, bare returns, and interactive entry-point guards.
const FORBIDDEN_PREFIXES: &[&str] = &["return ", "def ", "class ", "if __name__"];

fn tagged_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```[A-Za-z][A-Za-z0-9_+-]*[ \t]*\r?\n").expect("static fence pattern")
    })
}

/// Narrow the raw response down to the candidate script text.
///
/// A language-tagged fence wins over an untagged one; with no closer the
/// block runs to the end of the response; with no fence at all the whole
/// response is the candidate.
fn extract_candidate(raw: &str) -> &str {
    if let Some(open) = tagged_fence_re().find(raw) {
        let rest = &raw[open.end()..];
        return match rest.find("```") {
            Some(close) => &rest[..close],
            None => rest,
        };
    }
    if let Some(open) = raw.find("```") {
        let rest = &raw[open + 3..];
        return match rest.find("```") {
            Some(close) => &rest[..close],
            None => rest,
        };
    }
    raw
}

/// Filter an untrusted model response down to a flat script fragment.
///
/// This is a line heuristic, not a parser: it can over-retain prose that
/// happens to contain `=` or `(`, and it can drop a continuation line that
/// carries neither. Downstream behavior depends on these exact tie-breaks,
/// so change them only together with the tests below.
///
/// Returns the fragment plus human-readable warnings about what was dropped.
pub fn sanitize(raw: &str) -> (String, Vec<String>) {
    let candidate = extract_candidate(raw);

    let mut kept: Vec<&str> = Vec::new();
    let mut dropped_prose = 0usize;
    let mut dropped_forbidden = 0usize;

    for line in candidate.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        let looks_like_code = CODE_PREFIXES.iter().any(|p| stripped.starts_with(p))
            || stripped.contains('=')
            || stripped.contains('(');
        if !looks_like_code {
            dropped_prose += 1;
            continue;
        }

        // Checked after the prose rule; overrides any code classification.
        if FORBIDDEN_PREFIXES.iter().any(|p| stripped.starts_with(p)) {
            dropped_forbidden += 1;
            continue;
        }

        // Keep the line verbatim so internal indentation survives.
        kept.push(line);
    }

    let mut warnings = Vec::new();
    if dropped_prose > 0 {
        warnings.push(format!("dropped {} prose line(s)", dropped_prose));
    }
    if dropped_forbidden > 0 {
        warnings.push(format!(
            "dropped {} forbidden construct line(s) (def/class/return/__main__ guard)",
            dropped_forbidden
        ));
    }

    let fragment = kept.join("\n").trim().to_string();
    if fragment.is_empty() {
        warnings.push("nothing survived sanitization; the engine run will create no objects".into());
    }
    (fragment, warnings)
}
