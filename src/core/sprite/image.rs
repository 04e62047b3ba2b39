//=========================================================================
// Image Loader
//=========================================================================
//
// Asynchronous image decoding for sprites.
//
// Architecture:
// ```text
//   ImageLoader::load(path) ──LoadJob──> [decode worker thread]
//        │                                     │ image::open → RGBA
//        └─> PendingImage <──── reply channel ─┘
//
//   Sprite::poll_image() → PendingImage::poll()   (never blocks)
// ```
//
// Failures never propagate to game code: the sprite swaps in a
// placeholder and blinks. The worker exits once the loader is dropped
// and its job channel disconnects.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::thread;

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};
use log::{debug, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::surface::DecodedImage;

//=== ImageLoadError ======================================================

/// Why an image could not be produced. Logged, never surfaced to games.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The source could not be read or decoded.
    #[error("failed to decode {source_name}: {error}")]
    Decode {
        source_name: String,
        #[source]
        error: image::ImageError,
    },

    /// The decoded buffer did not match its reported dimensions.
    #[error("decoded buffer for {0} has an unexpected size")]
    InvalidBuffer(String),

    /// The decode worker is not running.
    #[error("image worker is not running")]
    WorkerGone,
}

type LoadResult = Result<DecodedImage, ImageLoadError>;

//=== LoadJob =============================================================

enum JobSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

struct LoadJob {
    source: JobSource,
    reply: Sender<LoadResult>,
}

//=== PendingImage ========================================================

/// Handle to an image that is still being decoded.
pub struct PendingImage {
    receiver: Receiver<LoadResult>,
}

impl PendingImage {
    /// Non-blocking check. `None` while the decode is still running.
    ///
    /// A disconnected reply channel counts as a failure.
    pub fn poll(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ImageLoadError::WorkerGone)),
        }
    }

    /// A handle that is already resolved.
    pub fn resolved(result: LoadResult) -> Self {
        let (tx, rx) = bounded(1);
        // Capacity 1 and the receiver is alive, so this cannot fail.
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    #[cfg(test)]
    pub(crate) fn from_receiver(receiver: Receiver<LoadResult>) -> Self {
        Self { receiver }
    }

    #[cfg(test)]
    pub(crate) fn wait(&self, timeout: std::time::Duration) -> Option<LoadResult> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl std::fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingImage").finish_non_exhaustive()
    }
}

//=== ImageLoader =========================================================

/// Background decoder shared by every sprite of an instance.
pub struct ImageLoader {
    jobs: Sender<LoadJob>,
}

impl ImageLoader {
    //--- Construction -----------------------------------------------------

    /// Spawns the decode worker.
    ///
    /// If the thread cannot be spawned the loader still works: every load
    /// resolves immediately to [`ImageLoadError::WorkerGone`].
    pub fn new() -> Self {
        let (jobs, queue) = unbounded::<LoadJob>();

        let spawned = thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || run_worker(queue));

        match spawned {
            Ok(_) => info!(target: "image", "Image decode worker started"),
            Err(e) => warn!(target: "image", "Image decode worker failed to start: {}", e),
        }

        Self { jobs }
    }

    //--- Loading ----------------------------------------------------------

    /// Queues a decode of the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> PendingImage {
        let path = path.as_ref().to_path_buf();
        debug!(target: "image", "Queueing decode of {}", path.display());
        self.submit(JobSource::Path(path))
    }

    /// Queues a decode of an in-memory encoded image (PNG, GIF, ...).
    pub fn load_bytes(&self, bytes: Vec<u8>) -> PendingImage {
        debug!(target: "image", "Queueing decode of {} in-memory bytes", bytes.len());
        self.submit(JobSource::Bytes(bytes))
    }

    fn submit(&self, source: JobSource) -> PendingImage {
        let (reply, receiver) = bounded(1);

        if let Err(rejected) = self.jobs.send(LoadJob { source, reply }) {
            warn!(target: "image", "Decode worker gone, failing load immediately");
            let _ = rejected.0.reply.send(Err(ImageLoadError::WorkerGone));
        }

        PendingImage { receiver }
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

//=== Worker ==============================================================

fn run_worker(queue: Receiver<LoadJob>) {
    for job in queue.iter() {
        let result = decode(&job.source);
        if job.reply.send(result).is_err() {
            // Sprite dropped before the decode finished.
            debug!(target: "image", "Decode result discarded, requester gone");
        }
    }
    debug!(target: "image", "Image decode worker exiting");
}

fn decode(source: &JobSource) -> LoadResult {
    let (name, decoded) = match source {
        JobSource::Path(path) => (path.display().to_string(), image::open(path)),
        JobSource::Bytes(bytes) => (
            "<memory>".to_string(),
            image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(image::ImageError::IoError)
                .and_then(|reader| reader.decode()),
        ),
    };

    let rgba = decoded
        .map_err(|error| ImageLoadError::Decode { source_name: name.clone(), error })?
        .to_rgba8();

    DecodedImage::from_rgba_bytes(rgba.width(), rgba.height(), rgba.as_raw())
        .ok_or(ImageLoadError::InvalidBuffer(name))
}

//=== Placeholder =========================================================

/// Largest placeholder, in pixels, built at the sprite's own frame size.
const MAX_PLACEHOLDER_PIXELS: usize = 4096 * 4096;

/// Frame size used when the sprite's frame is too large to mirror.
const FALLBACK_PLACEHOLDER_SIZE: usize = 8;

/// Stand-in for an image that failed to load.
///
/// Two frames wide: frame 0 is a magenta/black checkerboard, frame 1 is
/// transparent, so toggling frames makes the sprite blink. Oversized frames
/// get a small fixed placeholder that is stretched when drawn.
pub(crate) fn placeholder(frame_width: u32, frame_height: u32) -> DecodedImage {
    const MAGENTA: u32 = 0xFFFF_00FF;
    const BLACK: u32 = 0xFF00_0000;

    let w = frame_width.max(1) as usize;
    let h = frame_height.max(1) as usize;
    let fits = w
        .checked_mul(2)
        .and_then(|row| row.checked_mul(h))
        .is_some_and(|total| total <= MAX_PLACEHOLDER_PIXELS);
    let (w, h) = if fits {
        (w, h)
    } else {
        warn!(
            target: "image",
            "Placeholder for {}x{} frame is too large, using {}px",
            frame_width,
            frame_height,
            FALLBACK_PLACEHOLDER_SIZE
        );
        (FALLBACK_PLACEHOLDER_SIZE, FALLBACK_PLACEHOLDER_SIZE)
    };

    let row = w * 2;
    let cell = (w.min(h) / 4).max(1);

    let mut pixels = vec![0u32; row * h];
    for y in 0..h {
        for x in 0..w {
            let checker = ((x / cell) + (y / cell)) % 2 == 0;
            pixels[y * row + x] = if checker { MAGENTA } else { BLACK };
        }
    }

    // Both dimensions are bounded by MAX_PLACEHOLDER_PIXELS, so they fit in u32.
    let (row, h) = (row as u32, h as u32);
    DecodedImage::from_argb(row, h, pixels).unwrap_or_else(|| DecodedImage::solid(row, h, MAGENTA))
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_in_memory_png() {
        let loader = ImageLoader::new();
        let pending = loader.load_bytes(encoded_png(32, 16));

        let image = pending.wait(TIMEOUT).expect("worker replied").expect("decoded");
        assert_eq!((image.width(), image.height()), (32, 16));
        assert_eq!(image.pixel(0, 0), Some(0xFF0A_141E));
    }

    #[test]
    fn missing_file_reports_decode_error() {
        let loader = ImageLoader::new();
        let pending = loader.load("/definitely/not/here/player.png");

        match pending.wait(TIMEOUT) {
            Some(Err(ImageLoadError::Decode { source_name, .. })) => {
                assert!(source_name.contains("player.png"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_bytes_report_decode_error() {
        let loader = ImageLoader::new();
        let pending = loader.load_bytes(vec![1, 2, 3, 4]);
        assert!(matches!(pending.wait(TIMEOUT), Some(Err(ImageLoadError::Decode { .. }))));
    }

    #[test]
    fn resolved_handle_polls_immediately() {
        let pending = PendingImage::resolved(Ok(DecodedImage::solid(1, 1, 0)));
        assert!(matches!(pending.poll(), Some(Ok(_))));
    }

    #[test]
    fn dropped_sender_is_worker_gone() {
        let (tx, rx) = bounded::<LoadResult>(1);
        drop(tx);
        let pending = PendingImage { receiver: rx };
        assert!(matches!(pending.poll(), Some(Err(ImageLoadError::WorkerGone))));
    }

    #[test]
    fn placeholder_has_checker_frame_and_blank_frame() {
        let image = placeholder(8, 8);
        assert_eq!((image.width(), image.height()), (16, 8));
        assert_eq!(image.pixel(0, 0), Some(0xFFFF_00FF));
        assert_eq!(image.pixel(2, 0), Some(0xFF00_0000));
        assert!((8..16).all(|x| image.pixel(x, 3) == Some(0)));
    }

    #[test]
    fn oversized_placeholder_falls_back_to_small_frame() {
        let image = placeholder(3_000_000_000, 16);
        assert_eq!((image.width(), image.height()), (16, 8));
        assert_eq!(image.pixel(0, 0), Some(0xFFFF_00FF));

        let image = placeholder(u32::MAX, u32::MAX);
        assert_eq!((image.width(), image.height()), (16, 8));
    }
}
