//! Steel cross-section counting through a hosted object-detection API.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::{DetectionConfig, ENV_DETECTION_API_KEY, ENV_DETECTION_MODEL};
use crate::error::{Result, ServiceError};

/// Outline colour for detected sections.
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Outline thickness in pixels.
pub const BOX_THICKNESS: u32 = 2;

/// Axis-aligned box in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One detected object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectedObject {
    pub name: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Result of analysing one image.
#[derive(Debug, Clone)]
pub struct Detection {
    pub count: usize,
    pub boxes: Vec<DetectedObject>,
    /// Input image with every box outlined.
    pub annotated: RgbImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictResponse {
    images: Vec<PredictImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictImage {
    results: Vec<DetectedObject>,
}

/// Client for the detection API.
#[derive(Debug, Clone)]
pub struct DetectionClient {
    client: reqwest::Client,
    config: DetectionConfig,
}

impl DetectionClient {
    pub fn new(config: DetectionConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// Count the sections in the image at `path`.
    ///
    /// Fails with [`ServiceError::ImageNotFound`] before any request is made
    /// when the file does not exist.
    pub async fn detect(&self, path: &Path) -> Result<Detection> {
        if !path.is_file() {
            return Err(ServiceError::ImageNotFound(path.to_path_buf()));
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingConfig(ENV_DETECTION_API_KEY))?;
        let model = self
            .config
            .model
            .as_deref()
            .ok_or(ServiceError::MissingConfig(ENV_DETECTION_MODEL))?;

        let image = image::open(path)?.to_rgb8();
        let mut jpeg = Vec::new();
        image.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

        let file = Part::bytes(jpeg)
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .part("file", file)
            .text("model", model.to_string())
            .text("imgsz", self.config.imgsz.to_string())
            .text("conf", self.config.conf.to_string())
            .text("iou", self.config.iou.to_string());

        tracing::debug!(endpoint = %self.config.endpoint, ?path, "Sending image for detection");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PredictResponse = response.json().await?;
        let boxes: Vec<DetectedObject> = body
            .images
            .into_iter()
            .flat_map(|image| image.results)
            .collect();

        let mut annotated = image;
        annotate(&mut annotated, &boxes);

        tracing::info!(count = boxes.len(), "Detection complete");
        Ok(Detection {
            count: boxes.len(),
            boxes,
            annotated,
        })
    }
}

/// Outline every box on `image`, clipped to its bounds.
///
/// Boxes come from a remote response, so coordinates are clamped to just
/// outside the image before converting to pixels. Boxes with non-finite
/// coordinates or lying entirely off the image are skipped.
pub fn annotate(image: &mut RgbImage, boxes: &[DetectedObject]) {
    let (image_width, image_height) = image.dimensions();
    for object in boxes {
        let BoundingBox { x1, y1, x2, y2 } = object.bbox;
        let (Some((left, width)), Some((top, height))) = (
            pixel_span(x1, x2, image_width),
            pixel_span(y1, y2, image_height),
        ) else {
            tracing::debug!(bbox = ?object.bbox, "Skipping box outside the image");
            continue;
        };

        for inset in 0..BOX_THICKNESS {
            let (Some(w), Some(h)) = (
                width.checked_sub(2 * inset).filter(|w| *w > 0),
                height.checked_sub(2 * inset).filter(|h| *h > 0),
            ) else {
                break;
            };
            let offset = inset as i32;
            let rect = Rect::at(left.saturating_add(offset), top.saturating_add(offset))
                .of_size(w, h);
            draw_hollow_rect_mut(image, rect, BOX_COLOR);
        }
    }
}

/// Start and length in pixels of the span between `a` and `b` along an axis
/// of `limit` pixels.
///
/// Ends past the image are pulled in to `BOX_THICKNESS` pixels outside it,
/// so the clipped outline stays invisible there.
fn pixel_span(a: f64, b: f64, limit: u32) -> Option<(i32, u32)> {
    if !a.is_finite() || !b.is_finite() || limit == 0 {
        return None;
    }
    let margin = f64::from(BOX_THICKNESS);
    let last = f64::from(limit - 1);
    let low = a.min(b).round();
    let high = a.max(b).round();
    if high < 0.0 || low > last {
        return None;
    }
    let low = low.max(-margin);
    let high = high.min(last + margin);
    let start = i32::try_from(low as i64).ok()?;
    let length = u32::try_from((high - low) as i64 + 1).ok()?;
    Some((start, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(x1: f64, y1: f64, x2: f64, y2: f64) -> DetectedObject {
        DetectedObject {
            bbox: BoundingBox { x1, y1, x2, y2 },
            ..Default::default()
        }
    }

    #[test]
    fn test_annotate_draws_two_pixel_outline() {
        let mut image = RgbImage::new(20, 20);
        annotate(&mut image, &[object(2.0, 3.0, 12.0, 15.0)]);

        assert_eq!(*image.get_pixel(2, 3), BOX_COLOR);
        assert_eq!(*image.get_pixel(3, 4), BOX_COLOR);
        assert_eq!(*image.get_pixel(12, 15), BOX_COLOR);
        assert_eq!(*image.get_pixel(11, 14), BOX_COLOR);
        assert_eq!(*image.get_pixel(7, 9), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_degenerate_box() {
        let mut image = RgbImage::new(10, 10);
        annotate(&mut image, &[object(4.0, 4.0, 4.0, 4.0)]);
        assert_eq!(*image.get_pixel(4, 4), BOX_COLOR);
    }

    #[test]
    fn test_annotate_clamps_out_of_range_box() {
        let mut image = RgbImage::new(10, 10);
        annotate(&mut image, &[object(0.0, 0.0, 5e9, 5.0)]);

        assert_eq!(*image.get_pixel(0, 0), BOX_COLOR);
        assert_eq!(*image.get_pixel(9, 0), BOX_COLOR);
        assert_eq!(*image.get_pixel(9, 5), BOX_COLOR);
        assert_eq!(*image.get_pixel(0, 5), BOX_COLOR);
        assert_eq!(*image.get_pixel(5, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_skips_unusable_boxes() {
        let mut image = RgbImage::new(10, 10);
        annotate(
            &mut image,
            &[
                object(-5e12, -5e12, -1e12, 4.0),
                object(20.0, 20.0, 30.0, 30.0),
                object(f64::NAN, 0.0, 4.0, 4.0),
                object(0.0, f64::INFINITY, 4.0, 4.0),
            ],
        );
        assert!(image.pixels().all(|pixel| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_annotate_edge_beyond_image_stays_hidden() {
        let mut image = RgbImage::new(10, 10);
        annotate(&mut image, &[object(2.0, 2.0, 40.0, 6.0)]);
        assert_eq!(*image.get_pixel(9, 2), BOX_COLOR);
        assert_eq!(*image.get_pixel(9, 4), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_response_tolerates_missing_keys() {
        let body: PredictResponse = serde_json::from_str(
            r#"{"images":[{"results":[{"box":{"x1":1,"y1":2}},{"name":"shs"}]},{}]}"#,
        )
        .unwrap();
        let results: Vec<_> = body.images.into_iter().flat_map(|i| i.results).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].bbox.x2, 0.0);
        assert_eq!(results[1].name, "shs");
    }
}
