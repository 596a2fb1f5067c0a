//! User-created fishing spots and their persistence.

mod record;
mod store;

pub use record::{ImageId, SpotDraft, SpotId, SpotImage, SpotRecord};
pub use store::{SpotStore, SpotStoreError};

use tracing::{debug, warn};

use crate::domain::ports::{ImagePicker, ImagePickerError};

/// Let the user pick photos and append them to `draft`.
///
/// Returns how many images were added; a cancelled picker adds none.
pub async fn pick_images_into<P>(picker: &P, draft: &mut SpotDraft) -> Result<usize, ImagePickerError>
where
    P: ImagePicker + ?Sized,
{
    let picked = picker.pick_images().await.inspect_err(|err| {
        warn!(error = %err, "image picker failed");
    })?;
    let count = picked.len();
    draft.add_images(picked);
    debug!(count, spot = %draft.id, "attached picked images");
    Ok(count)
}
