pub mod feed;
pub mod media_source;
pub mod notifier;
pub mod permission;
pub mod transfer;

pub use feed::{FeedClient, Video};
pub use media_source::{FileMediaSource, MediaSource, PickerOptions};
pub use notifier::{ConsoleNotifier, Notifier};
pub use permission::{MediaLibraryGate, PermissionGate};
pub use transfer::{HttpTransferChannel, MultipartUpload, TransferChannel, upload_client};
