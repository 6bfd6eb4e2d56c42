//! Image upload lifecycle for the bulky item form, plus the validation and
//! dual-upload bookkeeping around it.

/// How long the transient success state shows before reverting to idle.
pub const SUCCESS_RESET_MS: u32 = 2000;

/// Upload button lifecycle: idle -> loading -> success (transient) or error
/// (sticky until the user retries). The success->idle reset runs on a timer
/// owned by the form component and cancelled at unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl UploadPhase {
    pub fn is_loading(self) -> bool {
        self == UploadPhase::Loading
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadPhase::Idle => "Upload",
            UploadPhase::Loading => "Loading...",
            UploadPhase::Success => "Uploaded",
            UploadPhase::Error => "Error",
        }
    }

    pub fn button_class(self) -> &'static str {
        match self {
            UploadPhase::Idle => "bg-blue-500 hover:bg-blue-600",
            UploadPhase::Loading => "bg-gray-300",
            UploadPhase::Success => "bg-green-500",
            UploadPhase::Error => "bg-amber-500",
        }
    }
}

/// Required fields of the bulky item form, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkyField {
    Title,
    Description,
    ImageUrl,
}

impl BulkyField {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkyField::Title => "title",
            BulkyField::Description => "description",
            BulkyField::ImageUrl => "image-url",
        }
    }
}

/// Check the three required fields in order, reporting the first missing
/// one. Whitespace-only text counts as missing, since the message body is
/// built from the trimmed fields. All three must be present before the
/// create/update callbacks fire.
pub fn validate_bulky(title: &str, description: &str, image_url: &str) -> Result<(), BulkyField> {
    if title.trim().is_empty() {
        return Err(BulkyField::Title);
    }
    if description.trim().is_empty() {
        return Err(BulkyField::Description);
    }
    if image_url.trim().is_empty() {
        return Err(BulkyField::ImageUrl);
    }
    Ok(())
}

/// The create path writes the same image twice: once to the external image
/// host (a disposable preview URL) and once to the channel's own file store
/// (the durable attachment id). This names the four ways that can land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualUpload {
    /// Both artifacts exist; the send may proceed.
    Complete,
    /// Preview hosted but the attachment upload failed; the preview URL is
    /// dropped and the send aborted.
    MissingAttachment,
    /// Attachment stored but no preview; the form never reaches submission
    /// in this state, it is reported for logging.
    MissingPreview,
    Nothing,
}

pub fn reconcile_dual_upload(preview_url: Option<&str>, attachment_id: Option<&str>) -> DualUpload {
    match (
        preview_url.filter(|url| !url.is_empty()),
        attachment_id.filter(|id| !id.is_empty()),
    ) {
        (Some(_), Some(_)) => DualUpload::Complete,
        (Some(_), None) => DualUpload::MissingAttachment,
        (None, Some(_)) => DualUpload::MissingPreview,
        (None, None) => DualUpload::Nothing,
    }
}

/// Strip the `data:<mime>;base64,` prefix from a data URL, yielding the raw
/// base64 payload the image host expects. Returns the input unchanged when
/// no prefix is present.
pub fn data_url_to_base64(data_url: &str) -> &str {
    if !data_url.starts_with("data:") {
        return data_url;
    }
    match data_url.split_once(',') {
        Some((_, payload)) => payload,
        None => data_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_order() {
        assert_eq!(validate_bulky("", "", ""), Err(BulkyField::Title));
        assert_eq!(validate_bulky("Coat", "", ""), Err(BulkyField::Description));
        assert_eq!(
            validate_bulky("Coat", "Size M", ""),
            Err(BulkyField::ImageUrl)
        );
        assert_eq!(validate_bulky("Coat", "Size M", "https://x/1.jpg"), Ok(()));
    }

    #[test]
    fn test_whitespace_only_fields_are_missing() {
        // The posted body is built from trimmed fields, so blanks must not
        // slip through as a present title or description.
        assert_eq!(validate_bulky("   ", "Size M", "u"), Err(BulkyField::Title));
        assert_eq!(
            validate_bulky("Coat", " \n ", "u"),
            Err(BulkyField::Description)
        );
        assert_eq!(
            validate_bulky("Coat", "Size M", "  "),
            Err(BulkyField::ImageUrl)
        );
    }

    #[test]
    fn test_missing_image_url_reports_image_url_field() {
        let err = validate_bulky("Coat", "Size M", "").unwrap_err();
        assert_eq!(err.as_str(), "image-url");
    }

    #[test]
    fn test_upload_phase_defaults_idle() {
        assert_eq!(UploadPhase::default(), UploadPhase::Idle);
        assert!(UploadPhase::Loading.is_loading());
        assert!(!UploadPhase::Error.is_loading());
    }

    #[test]
    fn test_reconcile_dual_upload() {
        assert_eq!(
            reconcile_dual_upload(Some("https://x/1.jpg"), Some("f1")),
            DualUpload::Complete
        );
        assert_eq!(
            reconcile_dual_upload(Some("https://x/1.jpg"), None),
            DualUpload::MissingAttachment
        );
        assert_eq!(
            reconcile_dual_upload(None, Some("f1")),
            DualUpload::MissingPreview
        );
        assert_eq!(reconcile_dual_upload(Some(""), Some("")), DualUpload::Nothing);
    }

    #[test]
    fn test_data_url_to_base64() {
        assert_eq!(
            data_url_to_base64("data:image/png;base64,iVBORw0KGgo="),
            "iVBORw0KGgo="
        );
        assert_eq!(data_url_to_base64("already-raw"), "already-raw");
    }
}
