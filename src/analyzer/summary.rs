use std::fmt;

use super::extract::FileChangeSet;

/// Per-file `path: +A/-R` fragments, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    fragments: Vec<String>,
}

impl Summary {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragments.join(", "))
    }
}

/// Count additions and removals for every file that has any.
pub fn generate_summary(changes: &FileChangeSet) -> Summary {
    let fragments = changes
        .iter()
        .filter_map(|file| {
            let adds = file.lines.iter().filter(|l| l.starts_with('+')).count();
            let removes = file.lines.iter().filter(|l| l.starts_with('-')).count();
            (adds + removes > 0).then(|| format!("{}: +{adds}/-{removes}", file.path))
        })
        .collect();

    Summary { fragments }
}
