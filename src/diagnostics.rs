use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

// file:line:col: kind: message, tool: kind: message, or a bare kind: message
static DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:[^:\n]+:(?:\d+:){0,2})?\s*(fatal error|error|warning|note|optimized|missed):\s",
    )
    .unwrap()
});

/// Diagnostic counts found in compiler or analyzer stderr.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub notes: usize,
    /// `-fopt-info` vectorizer reports.
    pub optimized: usize,
    pub missed: usize,
}

impl Summary {
    pub fn scan(text: &str) -> Self {
        let mut summary = Self::default();
        for cap in DIAGNOSTIC.captures_iter(text) {
            match &cap[1] {
                "fatal error" | "error" => summary.errors += 1,
                "warning" => summary.warnings += 1,
                "note" => summary.notes += 1,
                "optimized" => summary.optimized += 1,
                "missed" => summary.missed += 1,
                _ => {}
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

fn plural(f: &mut std::fmt::Formatter<'_>, count: usize, word: &str) -> std::fmt::Result {
    write!(f, "{} {}{}", count, word, if count == 1 { "" } else { "s" })
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        plural(f, self.errors, "error")?;
        write!(f, ", ")?;
        plural(f, self.warnings, "warning")?;
        if self.notes > 0 {
            write!(f, ", ")?;
            plural(f, self.notes, "note")?;
        }
        if self.optimized + self.missed > 0 {
            write!(
                f,
                ", {} optimized / {} missed",
                self.optimized, self.missed
            )?;
        }
        Ok(())
    }
}
