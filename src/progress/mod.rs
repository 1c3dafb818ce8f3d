//! Progress module containing progress bar functionality.
//!
//! - `style` - Progress bar styling options and templates
//! - `display` - Progress bars shared by the workers
//!
//! ```rust
//! use fetchpool::downloader::DownloaderBuilder;
//! use fetchpool::progress::{ProgressBarOpts, StyleOptions};
//!
//! let builder = DownloaderBuilder::new().style_options(StyleOptions::new(
//!     ProgressBarOpts::hidden(),
//!     ProgressBarOpts::with_bytes_style(),
//! ));
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
