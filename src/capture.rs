// ABOUTME: Capture gateway turning photo files and camera frames into analysable images
// ABOUTME: Format sniffing, base64 payloads, preview data URLs, and a scoped camera session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Capture Gateway
//!
//! A [`CapturedImage`] is the unit the analysis gateway consumes: raw bytes
//! plus a MIME type. Images come either from disk, sent as-is, or from a
//! [`CameraDevice`], re-encoded as JPEG.
//!
//! Camera access is scoped by [`CameraSession`]: every track is stopped when
//! the session ends, whether the frame was captured, the capture failed, the
//! user cancelled, or the session was simply dropped.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use calorie_core::constants::messages;

/// JPEG quality for camera frames
pub const JPEG_QUALITY: u8 = 95;

/// MIME type of encoded camera frames
const JPEG_MIME_TYPE: &str = "image/jpeg";

/// An image ready to be sent for analysis
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl CapturedImage {
    /// Wrap bytes after checking they are a recognised image format
    ///
    /// # Errors
    ///
    /// Returns a validation error if the bytes are not an image
    pub fn from_bytes(bytes: Vec<u8>) -> AppResult<Self> {
        let format = image::guess_format(&bytes)
            .map_err(|e| AppError::invalid_input("file is not a supported image").with_source(e))?;
        Ok(Self {
            mime_type: format.to_mime_type().to_owned(),
            bytes,
        })
    }

    /// Read an image file from disk
    ///
    /// # Errors
    ///
    /// Returns a validation error if the file cannot be read or is not an image
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            AppError::invalid_input(format!("cannot read image {}: {e}", path.display()))
                .with_source(e)
        })?;
        let image = Self::from_bytes(bytes)?;
        debug!(path = %path.display(), mime_type = %image.mime_type, bytes = image.bytes.len(), "Loaded image file");
        Ok(image)
    }

    /// Encode a camera frame as JPEG
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn from_frame(frame: &RgbImage) -> AppResult<Self> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
            .encode_image(frame)
            .map_err(|e| AppError::internal(format!("JPEG encoding failed: {e}")).with_source(e))?;
        Ok(Self {
            bytes,
            mime_type: JPEG_MIME_TYPE.to_owned(),
        })
    }

    /// Raw image bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/png`
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload for the AI request
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// `data:` URL used as the stored preview of a food log
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl Debug for CapturedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CapturedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

// ============================================================================
// Camera
// ============================================================================

/// A camera that can stream frames
pub trait CameraDevice {
    /// Acquire the device and start its video tracks
    ///
    /// # Errors
    ///
    /// Returns an error if permission is denied or no device exists
    fn start(&mut self) -> AppResult<()>;

    /// Grab the current frame
    ///
    /// # Errors
    ///
    /// Returns an error if no frame is available
    fn grab_frame(&mut self) -> AppResult<RgbImage>;

    /// Stop every active track and release the device
    fn stop_all_tracks(&mut self);
}

/// Open camera; tracks are stopped when this is dropped
pub struct CameraSession<'a, D: CameraDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: CameraDevice + ?Sized> CameraSession<'a, D> {
    /// Start the camera
    ///
    /// # Errors
    ///
    /// Returns `CameraUnavailable` if the device cannot be started
    pub fn open(device: &'a mut D) -> AppResult<Self> {
        if let Err(e) = device.start() {
            warn!(error = %e, "Camera failed to start");
            // A partially started device may still hold tracks
            device.stop_all_tracks();
            return Err(AppError::camera_unavailable(messages::CAMERA_UNAVAILABLE).with_source(e));
        }
        debug!("Camera session opened");
        Ok(Self { device })
    }

    /// Capture one frame as JPEG and close the session
    ///
    /// # Errors
    ///
    /// Returns an error if grabbing or encoding the frame fails
    pub fn capture(self) -> AppResult<CapturedImage> {
        let frame = self.device.grab_frame()?;
        CapturedImage::from_frame(&frame)
    }

    /// Close the session without capturing
    pub fn cancel(self) {
        debug!("Camera capture cancelled");
    }
}

impl<D: CameraDevice + ?Sized> Drop for CameraSession<'_, D> {
    fn drop(&mut self) {
        self.device.stop_all_tracks();
        debug!("Camera tracks stopped");
    }
}

/// Open the camera, take one picture, and release the camera
///
/// # Errors
///
/// Returns `CameraUnavailable` if the camera cannot be opened, or the capture error
pub fn capture_from_camera<D: CameraDevice + ?Sized>(device: &mut D) -> AppResult<CapturedImage> {
    CameraSession::open(device)?.capture()
}

/// Device for environments without camera access
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCamera;

impl CameraDevice for UnavailableCamera {
    fn start(&mut self) -> AppResult<()> {
        Err(AppError::camera_unavailable(messages::CAMERA_UNAVAILABLE))
    }

    fn grab_frame(&mut self) -> AppResult<RgbImage> {
        Err(AppError::camera_unavailable(messages::CAMERA_UNAVAILABLE))
    }

    fn stop_all_tracks(&mut self) {}
}
