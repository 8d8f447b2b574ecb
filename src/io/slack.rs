pub mod client;
pub mod dtos;

use crate::prelude::*;

/// Where a finished report goes. Both calls post something visible, there's no undo.
pub trait Notifier {
    /// Posts the text summary.
    fn send_text(&self, text: &str) -> AppResult<()>;

    /// Uploads the chart as a PNG file.
    fn send_image(&self, png: &[u8]) -> AppResult<()>;
}
