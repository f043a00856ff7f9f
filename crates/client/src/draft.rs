//! The in-progress report being authored.
//!
//! A [`DraftReport`] collects the scalar fields plus two independently
//! growable sub-collections (photos, relatives) before submission. The
//! collections are held privately so their invariants survive arbitrary
//! caller mutation: relatives always keep at least one slot, photos keep
//! append order.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::models::Gender;
use reunite_common::{AppError, AppResult};

/// One relative-contact slot on the draft form.
///
/// Empty strings mean unfilled, mirroring form state. A slot whose name is
/// blank is excluded from submission regardless of its other fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelativeDraft {
    /// Contact name. Blank marks the whole slot as unfilled.
    pub name: String,
    /// Relationship to the missing person.
    pub relationship: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Contact address.
    pub address: String,
}

impl RelativeDraft {
    /// Whether this slot is filled in enough to submit.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A photo staged for upload.
///
/// The draft exclusively owns the bytes until submission succeeds; there is
/// no server identity until the server confirms the stored resource.
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    /// File name sent to the server.
    pub file_name: String,
    /// MIME content type of the bytes.
    pub content_type: String,
    /// The image bytes.
    pub data: Bytes,
    /// Where the bytes were read from, for display purposes only.
    pub source_path: Option<PathBuf>,
}

impl PhotoAttachment {
    /// Create an attachment from in-memory bytes.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
            source_path: None,
        }
    }

    /// Load an attachment from a file, guessing the content type from the
    /// extension.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| {
                AppError::Validation(format!("Photo path has no file name: {}", path.display()))
            })?;

        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::Validation(format!("Cannot read photo {}: {e}", path.display()))
        })?;

        let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

        Ok(Self {
            file_name,
            content_type,
            data: Bytes::from(data),
            source_path: Some(path.to_path_buf()),
        })
    }
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Full name is required".into());
        return Err(err);
    }
    Ok(())
}

/// The report being authored.
///
/// Scalar fields are plain data; blank optionals are omitted from the
/// submission payload entirely, never sent as empty strings.
#[derive(Debug, Clone, Validate)]
pub struct DraftReport {
    /// Full name of the missing person. The only required field.
    #[validate(custom(function = non_blank))]
    pub full_name: String,
    /// Age in years.
    pub age: Option<u32>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Height in centimeters.
    pub height: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Hair color.
    pub hair_color: Option<String>,
    /// Eye color.
    pub eye_color: Option<String>,
    /// Where the person was last seen.
    pub last_seen_location: Option<String>,
    /// When the person was last seen.
    pub last_seen_date: Option<NaiveDateTime>,
    /// Free-form description.
    pub description: Option<String>,

    photos: Vec<PhotoAttachment>,
    relatives: Vec<RelativeDraft>,
}

impl DraftReport {
    /// Create an empty draft with one blank relative slot and no photos.
    #[must_use]
    pub fn new() -> Self {
        Self {
            full_name: String::new(),
            age: None,
            gender: None,
            height: None,
            weight: None,
            hair_color: None,
            eye_color: None,
            last_seen_location: None,
            last_seen_date: None,
            description: None,
            photos: Vec::new(),
            relatives: vec![RelativeDraft::default()],
        }
    }

    /// The staged photos, in append order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoAttachment] {
        &self.photos
    }

    /// Stage a photo for upload.
    pub fn add_photo(&mut self, photo: PhotoAttachment) {
        self.photos.push(photo);
    }

    /// Remove the photo at `index`, returning it.
    pub fn remove_photo(&mut self, index: usize) -> Option<PhotoAttachment> {
        if index < self.photos.len() {
            Some(self.photos.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn clear_photos(&mut self) {
        self.photos.clear();
    }

    /// The relative slots, in order.
    #[must_use]
    pub fn relatives(&self) -> &[RelativeDraft] {
        &self.relatives
    }

    /// Append a blank relative slot and return it for filling in.
    pub fn add_relative(&mut self) -> &mut RelativeDraft {
        self.relatives.push(RelativeDraft::default());
        let last = self.relatives.len() - 1;
        &mut self.relatives[last]
    }

    /// Mutable access to the relative slot at `index`.
    pub fn relative_mut(&mut self, index: usize) -> Option<&mut RelativeDraft> {
        self.relatives.get_mut(index)
    }

    /// Remove the relative slot at `index`.
    ///
    /// Returns `false` without removing when only one slot remains or the
    /// index is out of range. At least one slot is always present, even
    /// blank.
    pub fn remove_relative(&mut self, index: usize) -> bool {
        if self.relatives.len() <= 1 || index >= self.relatives.len() {
            return false;
        }
        self.relatives.remove(index);
        true
    }
}

impl Default for DraftReport {
    fn default() -> Self {
        Self::new()
    }
}
