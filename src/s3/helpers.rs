use std::path::Path;

/// Content-Type used when nothing can be inferred from the file name
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Suffixes that stand for a longer double extension
const SUFFIX_ALIASES: &[(&str, &str)] = &[
    (".tgz", ".tar.gz"),
    (".taz", ".tar.gz"),
    (".tz", ".tar.gz"),
    (".tbz2", ".tar.bz2"),
    (".txz", ".tar.xz"),
    (".svgz", ".svg.gz"),
];

/// Suffixes that mark a compressed file, and the encoding they imply
const ENCODINGS: &[(&str, &str)] = &[
    (".gz", "gzip"),
    (".Z", "compress"),
    (".bz2", "bzip2"),
    (".xz", "xz"),
    (".br", "br"),
];

/// MIME type and content encoding inferred from a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Inferred MIME type, `None` when the extension is unknown
    pub mime: Option<String>,
    pub encoding: Option<&'static str>,
}

impl ContentType {
    /// MIME type to send, falling back to `text/plain`
    pub fn mime_or_default(&self) -> &str {
        self.mime.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE)
    }
}

/// Detect Content-Type and encoding based on file extension
///
/// A compression suffix (`.gz`, `.br`, ...) is peeled off first and reported
/// as the encoding; the MIME type then comes from the remaining extension,
/// so `bundle.tar.gz` is `application/x-tar` with `gzip` encoding.
pub fn detect_content_type(path: &Path) -> ContentType {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return ContentType {
            mime: None,
            encoding: None,
        };
    };

    let mut name = name.into_owned();
    if let Some((alias, full)) = SUFFIX_ALIASES
        .iter()
        .find(|(alias, _)| has_suffix(&name, alias))
    {
        name.truncate(name.len() - alias.len());
        name.push_str(full);
    }

    let mut encoding = None;
    if let Some((suffix, enc)) = ENCODINGS.iter().find(|(suffix, _)| has_suffix(&name, suffix)) {
        name.truncate(name.len() - suffix.len());
        encoding = Some(*enc);
    }

    let mime = Path::new(&name)
        .extension()
        .and_then(|_| mime_guess::from_path(&name).first())
        .map(|m| m.essence_str().to_string());

    ContentType { mime, encoding }
}

/// `name` ends with `suffix` and has a non-empty stem before it
fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() > suffix.len() && name.ends_with(suffix)
}
