//=========================================================================
// Format Loaders
//=========================================================================
//
// Extension-matched decoders that turn raw bytes into `Resource`s.
//
// Extension rule:
//   "maps/file.animation.json" → ".animation.json"   (first dot of the name)
//   "README"                   → "README"            (no dot: bare name)
//
// A file without a dot therefore only matches a loader that explicitly
// lists its bare name, which none of the built-ins do.
//
// New asset types are added by registering another `FormatLoader`; the
// dispatcher never changes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{AssetSource, LoadError, Resource};
use crate::core::render::PixelBuffer;

//=== FormatLoader ========================================================

pub trait FormatLoader: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Claimed extensions, dot included (e.g. `".png"`).
    fn extensions(&self) -> &[&str];

    /// Exact match: `.PNG` is not `.png`.
    fn loads(&self, extension: &str) -> bool {
        self.extensions().iter().any(|claimed| *claimed == extension)
    }

    fn decode(&self, path: &str, bytes: &[u8]) -> Result<Resource, LoadError>;
}

/// Built-in loaders in registration order: images, then fonts.
pub fn default_loaders() -> Vec<Arc<dyn FormatLoader>> {
    vec![Arc::new(ImageLoader), Arc::new(FontLoader)]
}

//=== Extension Matching ==================================================

/// Longest dotted suffix of the file name (see module docs).
pub fn file_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.find('.') {
        Some(dot) if dot > 0 => &name[dot..],
        _ => name,
    }
}

//--- Dispatch ------------------------------------------------------------

/// Reads `path` and decodes it with the first matching loader that
/// succeeds. Failures are logged; `None` means the file was skipped.
pub(crate) fn load_asset(
    source: &dyn AssetSource,
    loaders: &[Arc<dyn FormatLoader>],
    path: &str,
) -> Option<Resource> {
    let extension = file_extension(path);
    let mut candidates = loaders.iter().filter(|loader| loader.loads(extension)).peekable();

    if candidates.peek().is_none() {
        warn!("No loader registered for {} (extension {:?}), skipping", path, extension);
        return None;
    }

    let bytes = match source.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path, e);
            return None;
        }
    };

    for loader in candidates {
        match loader.decode(path, &bytes) {
            Ok(resource) => {
                debug!("Loaded {} with {}", path, loader.name());
                return Some(resource);
            }
            Err(e) => warn!("{} failed to decode {}: {}", loader.name(), path, e),
        }
    }

    None
}

//=== ImageLoader =========================================================

/// PNG and JPEG images, decoded to [`PixelBuffer`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl FormatLoader for ImageLoader {
    fn name(&self) -> &str {
        "ImageLoader"
    }

    fn extensions(&self) -> &[&str] {
        &[".png", ".jpg", ".jpeg"]
    }

    fn decode(&self, _path: &str, bytes: &[u8]) -> Result<Resource, LoadError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Resource::Image(Arc::new(PixelBuffer::from_rgba(&image))))
    }
}

//=== FontLoader ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    /// `0x00010000` or `true`.
    TrueType,
    /// `OTTO` (CFF outlines).
    OpenType,
    /// `ttcf`.
    Collection,
    /// `typ1`.
    PostScript,
}

impl FontFormat {
    fn from_signature(signature: [u8; 4]) -> Option<Self> {
        match &signature {
            [0x00, 0x01, 0x00, 0x00] | b"true" => Some(Self::TrueType),
            b"OTTO" => Some(Self::OpenType),
            b"ttcf" => Some(Self::Collection),
            b"typ1" => Some(Self::PostScript),
            _ => None,
        }
    }
}

/// Raw sfnt font data. Rasterization is left to the application.
#[derive(Clone, PartialEq, Eq)]
pub struct FontData {
    pub format: FontFormat,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// TrueType/OpenType fonts, validated by their sfnt signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontLoader;

impl FormatLoader for FontLoader {
    fn name(&self) -> &str {
        "FontLoader"
    }

    fn extensions(&self) -> &[&str] {
        &[".otf", ".ttf"]
    }

    fn decode(&self, _path: &str, bytes: &[u8]) -> Result<Resource, LoadError> {
        let mut signature = [0u8; 4];
        let head = bytes.get(..4).ok_or_else(|| {
            LoadError::Decode(format!("font file too short ({} bytes)", bytes.len()))
        })?;
        signature.copy_from_slice(head);

        let format =
            FontFormat::from_signature(signature).ok_or(LoadError::InvalidFont(signature))?;

        Ok(Resource::Font(Arc::new(FontData {
            format,
            bytes: bytes.to_vec(),
        })))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::MemorySource;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    //=====================================================================
    // Extension Tests
    //=====================================================================

    #[test]
    fn extension_is_longest_dotted_suffix() {
        assert_eq!(file_extension("maps/file.animation.json"), ".animation.json");
        assert_eq!(file_extension("a/b/c.png"), ".png");
        assert_eq!(file_extension("font.TTF"), ".TTF");
    }

    #[test]
    fn extension_ignores_dots_in_directories() {
        assert_eq!(file_extension("v1.2/readme"), "readme");
    }

    #[test]
    fn dotless_and_hidden_files_yield_bare_name() {
        assert_eq!(file_extension("assets/LICENSE"), "LICENSE");
        assert_eq!(file_extension(".gitignore"), ".gitignore");
    }

    #[test]
    fn loads_matches_exact_extension() {
        assert!(ImageLoader.loads(".png"));
        assert!(!ImageLoader.loads(".PNG"));
        assert!(FontLoader.loads(".ttf"));
        assert!(!ImageLoader.loads(".animation.png"));
        assert!(!FontLoader.loads("LICENSE"));
    }

    //=====================================================================
    // Decoder Tests
    //=====================================================================

    #[test]
    fn image_loader_decodes_png() {
        let resource = ImageLoader.decode("a.png", &png_bytes()).unwrap();

        let Resource::Image(image) = resource else {
            panic!("Expected image resource");
        };
        assert_eq!(image.size(), (2, 1));
        assert_eq!(image.get(0, 0).unwrap().r, 255);
    }

    #[test]
    fn image_loader_rejects_garbage() {
        let err = ImageLoader.decode("a.png", b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Image(_)));
    }

    #[test]
    fn font_loader_accepts_known_signatures() {
        for (bytes, format) in [
            (&[0u8, 1, 0, 0, 9][..], FontFormat::TrueType),
            (&b"OTTO...."[..], FontFormat::OpenType),
            (&b"ttcf"[..], FontFormat::Collection),
        ] {
            let Resource::Font(font) = FontLoader.decode("f.ttf", bytes).unwrap() else {
                panic!("Expected font resource");
            };
            assert_eq!(font.format, format);
            assert_eq!(font.bytes, bytes);
        }
    }

    #[test]
    fn font_loader_rejects_bad_signature_and_short_files() {
        assert!(matches!(
            FontLoader.decode("f.otf", b"wOFF1234"),
            Err(LoadError::InvalidFont(sig)) if &sig == b"wOFF"
        ));
        assert!(matches!(FontLoader.decode("f.otf", b"OT"), Err(LoadError::Decode(_))));
    }

    //=====================================================================
    // Dispatch Tests
    //=====================================================================

    struct Failing;

    impl FormatLoader for Failing {
        fn name(&self) -> &str {
            "Failing"
        }
        fn extensions(&self) -> &[&str] {
            &[".png"]
        }
        fn decode(&self, _path: &str, _bytes: &[u8]) -> Result<Resource, LoadError> {
            Err(LoadError::Decode("always fails".into()))
        }
    }

    #[test]
    fn dispatch_falls_through_to_next_matching_loader() {
        let source = MemorySource::new().with_file("a.png", png_bytes());
        let loaders: Vec<Arc<dyn FormatLoader>> = vec![Arc::new(Failing), Arc::new(ImageLoader)];

        let resource = load_asset(&source, &loaders, "a.png");

        assert!(matches!(resource, Some(Resource::Image(_))));
    }

    #[test]
    fn dispatch_skips_unmatched_and_unreadable_files() {
        let source = MemorySource::new().with_file("notes.txt", b"hi".to_vec());
        let loaders = default_loaders();

        assert!(load_asset(&source, &loaders, "notes.txt").is_none());
        assert!(load_asset(&source, &loaders, "missing.png").is_none());
    }
}
