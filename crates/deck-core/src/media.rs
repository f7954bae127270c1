//! Media lookup, data URLs and deferred decoding of legacy vector images.

use crate::context::{RenderContext, ResolveCaches};
use crate::error::{ResolveError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use deck_data::{BlipFill, BlipMode, RectAlignment, RelativeRect, TargetMode, TileFlip};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

/// Byte-addressable media keyed by normalized package path.
pub trait MediaStore {
    fn get(&self, path: &str) -> Option<&[u8]>;
}

pub struct NoMedia;

impl MediaStore for NoMedia {
    fn get(&self, _path: &str) -> Option<&[u8]> {
        None
    }
}

impl MediaStore for BTreeMap<String, Vec<u8>> {
    fn get(&self, path: &str) -> Option<&[u8]> {
        BTreeMap::get(self, path).map(Vec::as_slice)
    }
}

impl MediaStore for HashMap<String, Vec<u8>> {
    fn get(&self, path: &str) -> Option<&[u8]> {
        HashMap::get(self, path).map(Vec::as_slice)
    }
}

/// Resolves a relationship target against the path of the part declaring it.
/// `("ppt/slides/slide1.xml", "../media/a.png")` gives `ppt/media/a.png`.
pub fn resolve_target(part_path: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match part_path.rfind('/') {
        Some(idx) => part_path[..idx].split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn extension(path: &str) -> String {
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn mime_for(path: &str) -> &'static str {
    match extension(path).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "pict" | "pct" => "image/x-pict",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Native pixel size of a raster image, if its header can be read.
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

// Deferred decoding

/// Legacy vector formats that need a raster decoder before they can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    Emf,
    Wmf,
    Pict,
}

impl DecodeKind {
    pub fn from_path(path: &str) -> Option<Self> {
        match extension(path).as_str() {
            "emf" | "emz" => Some(DecodeKind::Emf),
            "wmf" | "wmz" => Some(DecodeKind::Wmf),
            "pict" | "pct" => Some(DecodeKind::Pict),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DecodeKind::Emf => "emf",
            DecodeKind::Wmf => "wmf",
            DecodeKind::Pict => "pict",
        }
    }
}

pub trait RasterDecoder: Send + Sync {
    fn kind(&self) -> DecodeKind;

    /// Scan-converts the source into PNG bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>>;
}

#[derive(Default)]
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn RasterDecoder>>,
}

impl DecoderRegistry {
    pub const fn new() -> Self {
        Self {
            decoders: Vec::new(),
        }
    }

    pub fn register(&mut self, decoder: Box<dyn RasterDecoder>) {
        self.decoders.push(decoder);
    }

    pub fn find(&self, kind: DecodeKind) -> Option<&dyn RasterDecoder> {
        self.decoders
            .iter()
            .find(|d| d.kind() == kind)
            .map(|d| d.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeState {
    Pending,
    Ready(Arc<str>),
    Failed(ResolveError),
}

/// Paint slot shared by every shape that references the same legacy image.
/// Starts out pending and is filled once by the decode job.
#[derive(Debug, Clone)]
pub struct DeferredImage {
    path: Arc<str>,
    slot: Arc<OnceLock<Result<Arc<str>>>>,
}

impl DeferredImage {
    pub(crate) fn pending(path: &str) -> Self {
        Self {
            path: Arc::from(path),
            slot: Arc::new(OnceLock::new()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> DecodeState {
        match self.slot.get() {
            None => DecodeState::Pending,
            Some(Ok(url)) => DecodeState::Ready(Arc::clone(url)),
            Some(Err(e)) => DecodeState::Failed(e.clone()),
        }
    }

    /// Returns false when the slot was already filled.
    pub fn fulfill(&self, result: Result<Arc<str>>) -> bool {
        self.slot.set(result).is_ok()
    }

    pub fn shares_slot_with(&self, other: &DeferredImage) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl PartialEq for DeferredImage {
    fn eq(&self, other: &Self) -> bool {
        self.shares_slot_with(other)
    }
}

pub(crate) struct DecodeJob {
    pub path: String,
    pub kind: DecodeKind,
    pub bytes: Vec<u8>,
    pub slot: DeferredImage,
}

/// Runs every queued decode on the rayon pool and patches the shared slots.
/// Returns the number of jobs processed.
pub fn run_pending_decodes(caches: &ResolveCaches, decoders: &DecoderRegistry) -> usize {
    let jobs = caches.take_pending();
    let count = jobs.len();
    jobs.into_par_iter().for_each(|job| {
        let result = match decoders.find(job.kind) {
            Some(decoder) => decoder
                .decode(&job.bytes)
                .map(|png| Arc::from(data_url("image/png", &png))),
            None => Err(ResolveError::UnsupportedFormat {
                path: job.path.clone(),
                format: job.kind.name().to_string(),
            }),
        };
        if let Err(e) = &result {
            tracing::warn!(path = %job.path, error = %e, "legacy image decode failed");
        }
        job.slot.fulfill(result);
    });
    count
}

// Image paint

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(Arc<str>),
    Deferred(DeferredImage),
    /// Legacy format with no registered decoder.
    Unsupported { path: String, format: String },
    /// Relationship or media bytes absent.
    Missing,
}

/// Visible fraction of the source image after `srcRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crop {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Below this visible fraction a crop is considered degenerate.
pub const CROP_TOLERANCE: f64 = 0.001;

impl Crop {
    /// `None` means "show the whole image": either no crop was declared or
    /// the declared crop leaves less than [`CROP_TOLERANCE`] visible.
    pub fn from_rect(rect: &RelativeRect) -> Option<Crop> {
        let crop = Crop {
            left: rect.l as f64 / 100_000.0,
            top: rect.t as f64 / 100_000.0,
            right: rect.r as f64 / 100_000.0,
            bottom: rect.b as f64 / 100_000.0,
        };
        if crop.left == 0.0 && crop.top == 0.0 && crop.right == 0.0 && crop.bottom == 0.0 {
            return None;
        }
        if crop.visible_width() < CROP_TOLERANCE || crop.visible_height() < CROP_TOLERANCE {
            tracing::debug!(?rect, "degenerate crop ignored");
            return None;
        }
        Some(crop)
    }

    pub fn visible_width(&self) -> f64 {
        1.0 - self.left - self.right
    }

    pub fn visible_height(&self) -> f64 {
        1.0 - self.top - self.bottom
    }

    /// Scale applied to the source so the visible part fills the box.
    pub fn scale(&self) -> (f64, f64) {
        (1.0 / self.visible_width(), 1.0 / self.visible_height())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageLayout {
    /// Fill the box inset by the fractions of `fillRect`.
    Stretch {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
    /// Cover the box, centered, no repeat.
    Cover,
    /// Repeat at native size, scaled by `sx`/`sy`.
    Tile {
        offset_x: f64,
        offset_y: f64,
        scale_x: f64,
        scale_y: f64,
        flip: TileFlip,
        align: RectAlignment,
        native_size: Option<(u32, u32)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePaint {
    pub source: ImageSource,
    pub crop: Option<Crop>,
    pub layout: ImageLayout,
    pub alpha: f64,
}

pub fn resolve_blip(blip: &BlipFill, ctx: &RenderContext) -> ImagePaint {
    let (source, bytes) = match blip.embed.as_deref() {
        None => (ImageSource::Missing, None),
        Some(r_id) => match ctx.part.lookup(r_id) {
            None => {
                tracing::debug!(r_id, part = ctx.part.path, "image relationship not found");
                (ImageSource::Missing, None)
            }
            Some(rel) if rel.target_mode == TargetMode::External => {
                if crate::hyperlink::is_navigable_url(&rel.target) {
                    (ImageSource::Url(Arc::from(rel.target.as_str())), None)
                } else {
                    (ImageSource::Missing, None)
                }
            }
            Some(rel) => {
                let path = resolve_target(ctx.part.path, &rel.target);
                let bytes = ctx.media.get(&path);
                (image_source(&path, bytes, ctx), bytes)
            }
        },
    };

    let layout = match &blip.mode {
        BlipMode::Stretch {
            fill_rect: Some(rect),
        } => ImageLayout::Stretch {
            left: rect.l as f64 / 100_000.0,
            top: rect.t as f64 / 100_000.0,
            right: rect.r as f64 / 100_000.0,
            bottom: rect.b as f64 / 100_000.0,
        },
        BlipMode::Stretch { fill_rect: None } => ImageLayout::Cover,
        BlipMode::Tile(tile) => ImageLayout::Tile {
            offset_x: tile.tx,
            offset_y: tile.ty,
            scale_x: tile.sx as f64 / 100_000.0,
            scale_y: tile.sy as f64 / 100_000.0,
            flip: tile.flip,
            align: tile.algn,
            native_size: bytes.and_then(image_dimensions),
        },
    };

    ImagePaint {
        source,
        crop: blip.src_rect.as_ref().and_then(Crop::from_rect),
        layout,
        alpha: blip
            .alpha
            .map(|a| (a as f64 / 100_000.0).clamp(0.0, 1.0))
            .unwrap_or(1.0),
    }
}

fn image_source(path: &str, bytes: Option<&[u8]>, ctx: &RenderContext) -> ImageSource {
    let Some(bytes) = bytes else {
        tracing::debug!(path, "media bytes not found");
        return ImageSource::Missing;
    };
    if let Some(kind) = DecodeKind::from_path(path) {
        if ctx.decoders.find(kind).is_none() {
            return ImageSource::Unsupported {
                path: path.to_string(),
                format: kind.name().to_string(),
            };
        }
        return ImageSource::Deferred(ctx.caches.deferred_decode(path, kind, bytes));
    }
    ctx.caches
        .media_url(path, || Some(data_url(mime_for(path), bytes)))
        .map(ImageSource::Url)
        .unwrap_or(ImageSource::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_targets_resolve_against_part_directory() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(resolve_target("ppt/slides/slide1.xml", "/ppt/x.png"), "ppt/x.png");
    }

    #[test]
    fn degenerate_crop_is_no_crop() {
        let rect = RelativeRect {
            l: 60_000,
            t: 0,
            r: 39_950,
            b: 0,
        };
        assert_eq!(Crop::from_rect(&rect), None);
    }

    #[test]
    fn regular_crop_scales_visible_part() {
        let rect = RelativeRect {
            l: 25_000,
            t: 0,
            r: 25_000,
            b: 50_000,
        };
        let crop = Crop::from_rect(&rect).unwrap();
        let (sx, sy) = crop.scale();
        assert!((sx - 2.0).abs() < 1e-9);
        assert!((sy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn legacy_extensions_need_decoding() {
        assert_eq!(DecodeKind::from_path("ppt/media/image3.EMF"), Some(DecodeKind::Emf));
        assert_eq!(DecodeKind::from_path("ppt/media/image3.png"), None);
    }

    #[test]
    fn data_url_encodes_bytes() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }
}
