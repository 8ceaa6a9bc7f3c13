//! Colored terminal output utilities.

use console::{Style, Term};
use sitenav_site::{NavigationNode, SkippedRow};

/// Terminal output formatter.
///
/// Trees go to stdout so they can be piped; diagnostics go to stderr.
pub(crate) struct Output {
    term: Term,
    out: Term,
    yellow: Style,
    red: Style,
    cyan: Style,
    bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            out: Term::stdout(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan: Style::new().cyan(),
            bold: Style::new().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a document to stdout.
    pub(crate) fn document(&self, content: &str) {
        let _ = self.out.write_line(content);
    }

    /// Print navigation trees to stdout, one indented line per node.
    pub(crate) fn tree(&self, nodes: &[NavigationNode]) {
        let styles = TreeStyles {
            label: &self.bold,
            url: &self.cyan,
            missing: &self.yellow,
        };
        for line in tree_lines(nodes) {
            let _ = self.out.write_line(&line.render(&styles));
        }
    }

    /// Print skipped rows as warnings.
    pub(crate) fn skipped(&self, rows: &[SkippedRow]) {
        for row in rows {
            self.warning(&skipped_message(row));
        }
    }
}

/// One rendered row of a navigation tree.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TreeLine<'a> {
    pub level: u32,
    pub label: &'a str,
    pub url: Option<&'a str>,
}

/// Styles applied to the parts of a tree line.
pub(crate) struct TreeStyles<'s> {
    pub label: &'s Style,
    pub url: &'s Style,
    pub missing: &'s Style,
}

impl TreeLine<'_> {
    /// Indented `label  url` row, with `(no url)` when the node has none.
    pub(crate) fn render(&self, styles: &TreeStyles<'_>) -> String {
        let indent = "  ".repeat(self.level as usize);
        let label = styles.label.apply_to(self.label);
        let url = match self.url {
            Some(url) => styles.url.apply_to(url),
            None => styles.missing.apply_to("(no url)"),
        };
        format!("{indent}{label}  {url}")
    }
}

/// Flatten trees into lines in pre-order.
pub(crate) fn tree_lines(nodes: &[NavigationNode]) -> Vec<TreeLine<'_>> {
    nodes
        .iter()
        .flat_map(NavigationNode::descendants)
        .map(|node| TreeLine {
            level: node.level,
            label: &node.linktext,
            url: node.url.as_deref(),
        })
        .collect()
}

/// Warning text for a skipped row.
pub(crate) fn skipped_message(row: &SkippedRow) -> String {
    format!(
        "Skipped node {} ({}) at level {}: {}",
        row.node_id, row.asset, row.level, row.reason
    )
}
