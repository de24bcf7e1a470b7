use image::ImageFormat;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

use pixel_deduper_core::viewer::{render_contact_sheet, PreviewRequest, Viewer};

/// Shows compared images as one contact sheet written to the temp directory
///
/// The sheet stays on disk until the user presses ENTER.
pub struct ConsoleViewer {
    sheet_path: PathBuf,
}

impl ConsoleViewer {
    pub fn new() -> Self {
        Self {
            sheet_path: std::env::temp_dir()
                .join(format!("pixel-deduper-compare-{}.png", std::process::id())),
        }
    }
}

impl Default for ConsoleViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for ConsoleViewer {
    fn display(&mut self, request: &PreviewRequest) -> pixel_deduper_core::Result<()> {
        let sheet = render_contact_sheet(request)?;
        sheet.save_with_format(&self.sheet_path, ImageFormat::Png)?;
        info!(
            "Comparison sheet of {} image(s) written to {}",
            request.paths.len(),
            self.sheet_path.display()
        );

        let mut stdout = io::stdout();
        writeln!(stdout, "Comparison sheet: {}", self.sheet_path.display())?;
        for (i, path) in request.paths.iter().enumerate() {
            writeln!(stdout, "  [{}] {}", i, path.display())?;
        }
        write!(stdout, "Press ENTER to continue... ")?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().read_line(&mut line);

        if let Err(e) = std::fs::remove_file(&self.sheet_path) {
            debug!("Could not remove {}: {}", self.sheet_path.display(), e);
        }
        read?;
        Ok(())
    }
}
