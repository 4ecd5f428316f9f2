use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A regex that marks a line as a structurally meaningful change for one language.
#[derive(Debug)]
pub struct ChangeSignificancePattern {
    pub pattern: Regex,
    pub description: &'static str,
    /// Carried for ranking; nothing orders by it yet.
    pub priority: u8,
}

type RawPattern = (&'static str, &'static str, u8);

const GO: &[RawPattern] = &[
    (r"^[+-]\s*func\s+\w+", "function changes", 1),
    (r"^[+-]\s*type\s+\w+", "type definitions", 1),
    (r"^[+-]\s*struct\s*\{", "struct changes", 2),
    (r"^[+-]\s*interface\s*\{", "interface changes", 2),
];

const JAVASCRIPT: &[RawPattern] = &[
    (r"^[+-]\s*function\s+\w+", "function changes", 1),
    (r"^[+-]\s*const\s+\w+\s*=\s*\([^)]*\)\s*=>", "arrow functions", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*import\s+", "import changes", 2),
];

const PYTHON: &[RawPattern] = &[
    (r"^[+-]\s*def\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*@\w+", "decorator changes", 2),
];

const TYPESCRIPT: &[RawPattern] = &[
    (r"^[+-]\s*function\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*export\s+", "export changes", 2),
];

const JAVA: &[RawPattern] = &[
    (r"^[+-]\s*public\s+class\s+\w+", "class changes", 1),
    (r"^[+-]\s*public\s+interface\s+\w+", "interface changes", 1),
    (r"^[+-]\s*public\s+enum\s+\w+", "enum changes", 1),
    (r"^[+-]\s*public\s+static\s+void\s+main\s*\(", "main method changes", 1),
    (r"^[+-]\s*public\s+static\s+void\s+\w+\s*\(", "method changes", 2),
];

const JSX: &[RawPattern] = &[
    (r"^[+-]\s*function\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
];

const TSX: &[RawPattern] = &[
    (r"^[+-]\s*function\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
];

const SWIFT: &[RawPattern] = &[
    (r"^[+-]\s*func\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*extension\s+\w+", "extension changes", 2),
];

const KOTLIN: &[RawPattern] = &[
    (r"^[+-]\s*fun\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*interface\s+\w+", "interface changes", 2),
];

const PHP: &[RawPattern] = &[
    (r"^[+-]\s*function\s+\w+", "function changes", 1),
    (r"^[+-]\s*class\s+\w+", "class changes", 1),
    (r"^[+-]\s*interface\s+\w+", "interface changes", 2),
];

const LANGUAGES: &[(&str, &[RawPattern])] = &[
    ("go", GO),
    ("javascript", JAVASCRIPT),
    ("python", PYTHON),
    ("typescript", TYPESCRIPT),
    ("java", JAVA),
    ("jsx", JSX),
    ("tsx", TSX),
    ("swift", SWIFT),
    ("kotlin", KOTLIN),
    ("php", PHP),
];

static LANGUAGE_PATTERNS: LazyLock<HashMap<&'static str, Vec<ChangeSignificancePattern>>> =
    LazyLock::new(|| {
        LANGUAGES
            .iter()
            .map(|(language, raw)| {
                let compiled = raw
                    .iter()
                    .map(|(pattern, description, priority)| ChangeSignificancePattern {
                        pattern: Regex::new(pattern).expect("built-in significance pattern"),
                        description: *description,
                        priority: *priority,
                    })
                    .collect();
                (*language, compiled)
            })
            .collect()
    });

/// Patterns registered for `language`, or `None` when the language has no table entry.
pub fn patterns_for(language: &str) -> Option<&'static [ChangeSignificancePattern]> {
    LANGUAGE_PATTERNS.get(language).map(Vec::as_slice)
}

/// The first pattern of `language` that matches `line`.
pub fn significant_match(line: &str, language: &str) -> Option<&'static ChangeSignificancePattern> {
    patterns_for(language)?
        .iter()
        .find(|p| p.pattern.is_match(line))
}

/// Map a diff header (or a bare path) to a language id by file extension.
///
/// Only the new-file path (the last token of the header) is looked at. Unknown
/// extensions map to the empty string, which has no table entry.
pub fn detect_language(header: &str) -> &'static str {
    let path = header.split_whitespace().last().unwrap_or("");

    if path.ends_with(".go") {
        "go"
    } else if path.ends_with(".js") || path.ends_with(".ts") {
        "javascript"
    } else if path.ends_with(".py") {
        "python"
    } else if path.ends_with(".java") {
        "java"
    } else if path.ends_with(".c") || path.ends_with(".cpp") {
        "c"
    } else if path.ends_with(".rb") {
        "ruby"
    } else if path.ends_with(".cs") {
        "csharp"
    } else {
        ""
    }
}
