//! Animated GIF decoding and encoding.
//!
//! Decoding goes through the `image` crate's GIF decoder so that every
//! frame comes back fully composited at canvas size, alongside its stored
//! delay. Encoding uses the `gif` crate directly for control over delay,
//! repeat, and disposal.
//!
//! # Example
//!
//! ```no_run
//! use framestitch::{DurationPolicy, FramestitchError, GifOptions};
//!
//! let decoded = framestitch::decode_gif("input.gif", DurationPolicy::default())?;
//! let frames: Vec<_> = decoded.frames.into_iter().map(image::DynamicImage::from).collect();
//! framestitch::encode_gif("copy.gif", &frames, &GifOptions::new().frame_delay_ms(80))?;
//! # Ok::<(), FramestitchError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, RgbaImage};

use crate::configuration::DurationPolicy;
use crate::error::FramestitchError;
use crate::timing::normalize_durations;

/// Configuration for animated GIF output.
#[derive(Debug, Clone)]
pub struct GifOptions {
    /// Constant delay between frames in milliseconds (default: 83 ≈ 12 fps).
    ///
    /// GIF stores delays in hundredths of a second, so this is rounded to
    /// the nearest 10 ms on write (never below 10 ms).
    pub frame_delay_ms: u32,
    /// How many times the GIF should repeat. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Palette quantiser speed, 1 (best) to 30 (fastest). Default 10.
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_delay_ms: 83,
            repeat: None,
            speed: 10,
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constant delay between frames in milliseconds.
    pub fn frame_delay_ms(mut self, delay_ms: u32) -> Self {
        self.frame_delay_ms = delay_ms;
        self
    }

    /// Set the repeat count. `None` means loop forever.
    pub fn repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the quantiser speed (clamped to 1..=30).
    pub fn speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    /// Delay in the GIF's native unit of hundredths of a second.
    pub(crate) fn delay_centiseconds(&self) -> u16 {
        let centiseconds = (f64::from(self.frame_delay_ms) / 10.0).round();
        centiseconds.clamp(1.0, f64::from(u16::MAX)) as u16
    }
}

/// Frames and per-frame durations decoded from an animated GIF.
///
/// `frames` and `durations_ms` always have the same length.
#[derive(Debug, Clone)]
pub struct DecodedGif {
    /// Fully composited RGBA frames, in display order.
    pub frames: Vec<RgbaImage>,
    /// Display duration of each frame in milliseconds, already normalised.
    pub durations_ms: Vec<u32>,
}

impl DecodedGif {
    /// Number of decoded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when no frames were decoded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Decode every frame of an animated GIF together with its duration.
///
/// Frame delays that are missing or zero are replaced according to
/// `policy`.
///
/// # Errors
///
/// Returns [`FramestitchError::NotFound`] if `path` does not exist and
/// [`FramestitchError::GifDecodeError`] if the file is not a decodable GIF
/// or contains no frames.
pub fn decode_gif<P: AsRef<Path>>(
    path: P,
    policy: DurationPolicy,
) -> Result<DecodedGif, FramestitchError> {
    let path = path.as_ref();
    log::debug!("Decoding GIF {:?}", path);
    if !path.is_file() {
        return Err(FramestitchError::not_found(path, "input GIF does not exist"));
    }

    let reader = BufReader::new(File::open(path)?);
    let decoder = GifDecoder::new(reader)
        .map_err(|e| FramestitchError::GifDecodeError(format!("{}: {e}", path.display())))?;

    let mut frames = Vec::new();
    let mut raw_durations = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame
            .map_err(|e| FramestitchError::GifDecodeError(format!("{}: {e}", path.display())))?;
        let (numerator, denominator) = frame.delay().numer_denom_ms();
        let delay_ms = if denominator == 0 {
            0
        } else {
            (f64::from(numerator) / f64::from(denominator)).round() as i64
        };
        raw_durations.push(delay_ms);
        frames.push(frame.into_buffer());
    }

    if frames.is_empty() {
        return Err(FramestitchError::GifDecodeError(format!(
            "{}: no frames",
            path.display()
        )));
    }

    let durations_ms = normalize_durations(&raw_durations, policy);
    log::debug!("Decoded {} frames from {:?}", frames.len(), path);
    Ok(DecodedGif {
        frames,
        durations_ms,
    })
}

/// Encode a sequence of frames as an animated GIF at the given path.
///
/// Missing parent directories are created. Each frame is quantised to a
/// 256-colour palette and written with "restore to background" disposal.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] for an empty frame list
/// and [`FramestitchError::GifEncodeError`] if frames differ in size,
/// exceed GIF's 65535-pixel limit, or cannot be written.
pub fn encode_gif<P: AsRef<Path>>(
    path: P,
    frames: &[DynamicImage],
    options: &GifOptions,
) -> Result<(), FramestitchError> {
    let path = path.as_ref();
    log::debug!(
        "Encoding {} frames to GIF file {:?} (delay={}ms, repeat={:?})",
        frames.len(),
        path,
        options.frame_delay_ms,
        options.repeat,
    );
    if frames.is_empty() {
        return Err(FramestitchError::InvalidArgument(
            "cannot encode a GIF with no frames".to_string(),
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .map_err(|e| FramestitchError::GifEncodeError(format!("Failed to create GIF file: {e}")))?;
    let mut writer = BufWriter::new(file);
    write_gif(&mut writer, frames, options, |_| Ok(()))?;
    writer.flush()?;
    Ok(())
}

/// Encode a sequence of frames as an animated GIF into memory.
///
/// # Errors
///
/// Same as [`encode_gif`].
pub fn encode_gif_to_memory(
    frames: &[DynamicImage],
    options: &GifOptions,
) -> Result<Vec<u8>, FramestitchError> {
    encode_gif_to_memory_with(frames, options, |_| Ok(()))
}

/// [`encode_gif_to_memory`] calling `after_frame(position)` once each frame
/// is written. An error from the hook aborts the encode.
pub(crate) fn encode_gif_to_memory_with<F>(
    frames: &[DynamicImage],
    options: &GifOptions,
    after_frame: F,
) -> Result<Vec<u8>, FramestitchError>
where
    F: FnMut(usize) -> Result<(), FramestitchError>,
{
    if frames.is_empty() {
        return Err(FramestitchError::InvalidArgument(
            "cannot encode a GIF with no frames".to_string(),
        ));
    }
    let mut buffer = Vec::new();
    write_gif(&mut buffer, frames, options, after_frame)?;
    Ok(buffer)
}

/// Write finished GIF bytes to `path`, creating parent directories.
pub(crate) fn write_gif_file(path: &Path, bytes: &[u8]) -> Result<(), FramestitchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
        .map_err(|e| FramestitchError::GifEncodeError(format!("Failed to write GIF file: {e}")))
}

fn write_gif<W, F>(
    writer: W,
    frames: &[DynamicImage],
    options: &GifOptions,
    mut after_frame: F,
) -> Result<(), FramestitchError>
where
    W: Write,
    F: FnMut(usize) -> Result<(), FramestitchError>,
{
    let first = &frames[0];
    let (width, height) = gif_dimensions(first.width(), first.height())?;

    let mut encoder = Encoder::new(writer, width, height, &[]).map_err(|e| {
        FramestitchError::GifEncodeError(format!("Failed to create GIF encoder: {e}"))
    })?;

    let repeat = match options.repeat {
        None => Repeat::Infinite,
        Some(n) => Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| FramestitchError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

    let delay = options.delay_centiseconds();
    let speed = options.speed.clamp(1, 30);

    for (index, image) in frames.iter().enumerate() {
        if image.width() != first.width() || image.height() != first.height() {
            return Err(FramestitchError::GifEncodeError(format!(
                "frame {index} is {}x{}, expected {}x{}",
                image.width(),
                image.height(),
                first.width(),
                first.height(),
            )));
        }

        let mut pixels = image.to_rgba8().into_raw();
        let mut gif_frame = Frame::from_rgba_speed(width, height, &mut pixels, speed);
        gif_frame.delay = delay;
        gif_frame.dispose = DisposalMethod::Background;

        encoder.write_frame(&gif_frame).map_err(|e| {
            FramestitchError::GifEncodeError(format!("Failed to write GIF frame {index}: {e}"))
        })?;
        after_frame(index)?;
    }

    Ok(())
}

fn gif_dimensions(width: u32, height: u32) -> Result<(u16, u16), FramestitchError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(FramestitchError::GifEncodeError(format!(
            "frame size {width}x{height} is outside the GIF limits (1..=65535)"
        ))),
    }
}
