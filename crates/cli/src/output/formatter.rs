//! Output formatter for human-readable status lines
//!
//! The example prints section banners and listing lines; none of it is
//! meant to be parsed by machines.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use console::style;

use super::OutputConfig;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Formatter for CLI output
#[derive(Clone)]
pub struct Formatter {
    config: OutputConfig,
    out: SharedWriter,
}

impl Formatter {
    /// Create a new formatter writing to standard output
    pub fn new(config: OutputConfig) -> Self {
        Self::with_writer(config, std::io::stdout())
    }

    /// Create a formatter writing status lines to `writer`
    ///
    /// Errors still go to standard error.
    pub fn with_writer(config: OutputConfig, writer: impl Write + Send + 'static) -> Self {
        Self {
            config,
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Output configuration this formatter was built with
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && console::colors_enabled()
    }

    /// Print a section banner surrounded by blank lines
    pub fn banner(&self, title: &str) {
        self.write_line(&format!("\n\n{}\n\n", self.banner_text(title)));
    }

    fn banner_text(&self, title: &str) -> String {
        let text = format!("*** {title} ***");
        if self.colors_enabled() {
            style(text).bold().to_string()
        } else {
            text
        }
    }

    /// Print a line of text
    pub fn println(&self, message: &str) {
        self.write_line(message);
    }

    fn write_line(&self, line: &str) {
        // A closed stdout is not worth failing the run over.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }

    /// Output an error message on standard error
    pub fn error(&self, message: &str) {
        if self.colors_enabled() {
            eprintln!("{} {message}", style("✗").red());
        } else {
            eprintln!("✗ {message}");
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_no_color() {
        let config = OutputConfig {
            no_color: true,
            ..Default::default()
        };
        let formatter = Formatter::new(config);
        assert!(!formatter.colors_enabled());
    }

    #[test]
    fn test_banner_text_plain() {
        let formatter = Formatter::new(OutputConfig {
            no_color: true,
            ..Default::default()
        });
        assert_eq!(formatter.banner_text("Spaces Listing"), "*** Spaces Listing ***");
    }

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_banner_surrounded_by_blank_lines() {
        let buffer = Buffer::default();
        let formatter = Formatter::with_writer(
            OutputConfig {
                no_color: true,
                ..Default::default()
            },
            buffer.clone(),
        );
        formatter.println("before");
        formatter.banner("Spaces Listing");
        formatter.println("after");

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "before\n\n\n*** Spaces Listing ***\n\n\nafter\n");
    }

    #[test]
    fn test_formatter_keeps_config() {
        let formatter = Formatter::new(OutputConfig {
            no_progress: true,
            ..Default::default()
        });
        assert!(formatter.config().no_progress);
    }
}
