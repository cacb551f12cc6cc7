//! System check report (`audience-andy check`)

use colored::Colorize;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckItem {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

/// Pass/fail lines gathered by the binary before anything runs
#[derive(Debug, Default)]
pub struct CheckReport {
    items: Vec<CheckItem>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, ok: bool, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name: name.into(),
            ok,
            detail: detail.into(),
        });
    }

    pub fn pass(&mut self, name: impl Into<String>, detail: impl Into<String>) {
        self.record(name, true, detail);
    }

    pub fn fail(&mut self, name: impl Into<String>, detail: impl Into<String>) {
        self.record(name, false, detail);
    }

    pub fn items(&self) -> &[CheckItem] {
        &self.items
    }

    /// True when every check passed
    pub fn is_ok(&self) -> bool {
        self.items.iter().all(|item| item.ok)
    }

    pub fn failures(&self) -> usize {
        self.items.iter().filter(|item| !item.ok).count()
    }

    pub fn format(&self) -> String {
        let mut output = format!("{}\n", "=== System Check ===".cyan().bold());
        let width = self.items.iter().map(|i| i.name.len()).max().unwrap_or(0);
        for item in &self.items {
            let mark = if item.ok { "v".green() } else { "x".red() };
            output.push_str(&format!(
                "  {} {:<width$}  {}\n",
                mark,
                item.name,
                item.detail,
                width = width
            ));
        }
        output.push('\n');
        if self.is_ok() {
            output.push_str(&format!("{}\n", "All checks passed.".green().bold()));
        } else {
            output.push_str(&format!(
                "{}\n",
                format!("{} check(s) failed.", self.failures()).red().bold()
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_ok() {
        assert!(CheckReport::new().is_ok());
    }

    #[test]
    fn test_failures_counted_and_listed() {
        colored::control::set_override(false);
        let mut report = CheckReport::new();
        report.pass("OPENAI_API_KEY", "set");
        report.fail("SERPAPI_KEY", "not set");
        report.pass("taxonomy", "data/marketing_categories.json (9 categories)");

        assert!(!report.is_ok());
        assert_eq!(report.failures(), 1);
        let output = report.format();
        assert!(output.contains("x SERPAPI_KEY"));
        assert!(output.contains("v taxonomy"));
        assert!(output.contains("1 check(s) failed."));
    }
}
