//! Driven port for the platform photo picker.

use async_trait::async_trait;

use super::define_port_error;

/// An image chosen by the user, referenced by an opaque URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub uri: String,
}

define_port_error! {
    /// Errors raised by image picker adapters.
    pub enum ImagePickerError {
        /// The picker reported a failure.
        Failed { message: String } => "image picker failed: {message}",
    }
}

/// Port for letting the user choose photos from their library.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Show the picker and return the chosen images.
    ///
    /// Returns an empty list when the user cancels.
    async fn pick_images(&self) -> Result<Vec<PickedImage>, ImagePickerError>;
}
