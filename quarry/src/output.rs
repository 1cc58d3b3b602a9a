//! Output trait for rendering reports and errors.

/// Target output for reports.
///
/// Reports describe *what* to output using these semantic methods.
/// Implementations decide *how* to render it.
pub trait Output {
    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// Render an indented key-value pair.
    fn key_value_indented(&mut self, key: &str, value: &str);

    /// Render a bullet list item.
    fn list_item(&mut self, text: &str);

    /// Render a block of preformatted text.
    fn preformatted(&mut self, text: &str);

    /// Render one line of an error message.
    fn error(&mut self, line: &str);

    /// Render a fatal diagnostic.
    fn diagnostic(&mut self, report: miette::Report);
}

/// A report that can render itself to an output.
pub trait Report {
    /// Render this report to the given output.
    fn render(&self, out: &mut dyn Output);
}

/// Terminal output: reports on stdout, errors on stderr.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, name: &str) {
        println!("{}:", name);
    }

    fn key_value_indented(&mut self, key: &str, value: &str) {
        println!("  {}: {}", key, value);
    }

    fn list_item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, line: &str) {
        eprintln!("{}", line);
    }

    fn diagnostic(&mut self, report: miette::Report) {
        eprintln!("{:?}", report);
    }
}

/// Output collected in memory, one buffer per stream.
///
/// Diagnostics are flattened to `Error: <message>` followed by one
/// `  caused by: ...` line per source, so the text is stable across terminals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn out(&mut self, line: &str) {
        self.stdout.push_str(line);
        self.stdout.push('\n');
    }
}

impl Output for CapturedOutput {
    fn section(&mut self, name: &str) {
        self.out(&format!("{}:", name));
    }

    fn key_value_indented(&mut self, key: &str, value: &str) {
        self.out(&format!("  {}: {}", key, value));
    }

    fn list_item(&mut self, text: &str) {
        self.out(&format!("  - {}", text));
    }

    fn preformatted(&mut self, text: &str) {
        self.out(text);
    }

    fn error(&mut self, line: &str) {
        self.stderr.push_str(line);
        self.stderr.push('\n');
    }

    fn diagnostic(&mut self, report: miette::Report) {
        let mut chain = report.chain();
        if let Some(top) = chain.next() {
            self.error(&format!("Error: {}", top));
        }
        for cause in chain {
            self.error(&format!("  caused by: {}", cause));
        }
        if let Some(help) = report.help() {
            self.error(&format!("  help: {}", help));
        }
    }
}
