use crate::data::GistMetadata;
use crate::error::ResolveError;

/// The file chosen for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFile<'a> {
    pub name:    &'a str,
    pub raw_url: &'a str,
}

/// Picks the file to download.
///
/// With `target` set the file must exist under that exact name as a
/// non-empty entry; `null` and `{}` count as absent. Without it
/// the first file in service order wins; the service does not promise that
/// order is stable across calls.
pub fn resolve_file<'a>(
    meta: &'a GistMetadata,
    target: Option<&str>,
) -> Result<ResolvedFile<'a>, ResolveError> {
    let files = meta
        .files
        .as_ref()
        .filter(|files| !files.is_empty())
        .ok_or(ResolveError::NoFiles)?;

    let (name, file) = match target {
        Some(target) => files
            .get_key_value(target)
            .and_then(|(name, file)| {
                file.as_ref()
                    .filter(|f| !f.is_empty())
                    .map(|f| (name, f))
            })
            .ok_or_else(|| ResolveError::FileNotFound(target.to_string()))?,
        None => {
            let (name, file) = files.first().ok_or(ResolveError::NoFiles)?;
            (name, file.as_ref().ok_or(ResolveError::MissingRawUrl)?)
        }
    };

    let raw_url = file.raw_url().ok_or(ResolveError::MissingRawUrl)?;

    tracing::debug!(file = %name, %raw_url, files = meta.file_count(), "resolved gist file");

    Ok(ResolvedFile {
        name: name.as_str(),
        raw_url,
    })
}
