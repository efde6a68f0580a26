use log::debug;

use crate::analyzer::SkinAnalyzer;
use crate::error::ServeError;
use crate::response::Outcome;
use crate::Timer;

/// A file received under the `image` field.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// Declared content type, if the client sent one
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Upload {
            content_type: content_type.map(str::to_owned),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |ct| ct.starts_with("image/"))
    }
}

/// Run one upload through validation, analysis and response shaping.
pub async fn analyze_upload(
    upload: Option<Upload>,
    analyzer: &dyn SkinAnalyzer,
) -> Result<Outcome, ServeError> {
    let upload = upload.ok_or(ServeError::NoImage)?;

    if !upload.is_image() {
        return Err(ServeError::NotAnImage);
    }

    debug!(
        "Analyzing {} bytes of {}",
        upload.bytes.len(),
        upload.content_type.as_deref().unwrap_or_default()
    );

    let mut t = Timer::new_start("Analyzing skin");
    let result = analyzer.analyze(&upload.bytes).await;
    t.stop();

    Ok(Outcome::from(result?.assess()?))
}
