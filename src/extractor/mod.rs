pub mod catalog;
pub mod models;
pub mod traits;
pub mod ytdlp;

pub use catalog::FormatCatalog;
pub use models::{MediaFormat, VideoInfo};
pub use traits::Extractor;
pub use ytdlp::{find_ytdlp, YtDlpExtractor};
