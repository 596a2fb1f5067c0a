//! Image picker that returns a preset selection.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ImagePicker, ImagePickerError, PickedImage};

/// Picker that hands out queued selections in order, then reports
/// cancellation (an empty selection) once the queue is drained.
#[derive(Debug, Default)]
pub struct StaticImagePicker {
    selections: Mutex<Vec<Vec<PickedImage>>>,
}

impl StaticImagePicker {
    /// Queue one selection per inner list of URIs.
    pub fn with_selections<I, S>(selections: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        let mut queued: Vec<Vec<PickedImage>> = selections
            .into_iter()
            .map(|uris| {
                uris.into_iter()
                    .map(|uri| PickedImage { uri: uri.into() })
                    .collect()
            })
            .collect();
        queued.reverse();
        Self {
            selections: Mutex::new(queued),
        }
    }
}

#[async_trait]
impl ImagePicker for StaticImagePicker {
    async fn pick_images(&self) -> Result<Vec<PickedImage>, ImagePickerError> {
        let mut selections = self
            .selections
            .lock()
            .map_err(|err| ImagePickerError::failed(err.to_string()))?;
        Ok(selections.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_selections_in_order_then_cancels() {
        let picker = StaticImagePicker::with_selections([vec!["a.jpg", "b.jpg"], vec!["c.jpg"]]);

        let first = picker.pick_images().await.expect("first pick");
        let second = picker.pick_images().await.expect("second pick");
        let third = picker.pick_images().await.expect("third pick");

        assert_eq!(first.len(), 2);
        assert_eq!(second[0].uri, "c.jpg");
        assert!(third.is_empty());
    }
}
