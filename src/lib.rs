pub mod api;
pub mod clipboard;
pub mod color;
pub mod config;
pub mod feedback;
pub mod popup;
pub mod sampler;
pub mod session;
pub mod storage;
pub mod view;

pub use color::{ColorFormat, format_color, parse_hex_triplet, rgb_to_hsl};
pub use popup::Popup;
pub use sampler::{SampleError, SampleResult, Sampler};
pub use session::{MAX_RECENT_COLORS, Session, Theme};
