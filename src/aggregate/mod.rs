// Batch aggregation: reduce a set of annotated images to one Summary.
//
// A single pass over the images feeds three accumulators:
// 1. FaceTotals: likelihood weights from the first face of each image
// 2. The per-image dominant color (max pixel fraction)
// 3. The unique label set
//
// `finish` then picks the leading emotion, the dominant color across the
// per-image winners, and the top labels by topicality.

pub mod colors;
pub mod faces;
pub mod labels;

use anyhow::Result;
use tracing::debug;

use crate::models::{Color, Image, Summary};
use faces::FaceTotals;
use labels::UniqueLabels;

/// How many labels the summary reports.
pub const TOP_SUBJECTS: usize = 3;

/// Explicit accumulator for one aggregation pass.
#[derive(Default)]
pub struct Accumulator {
    faces: FaceTotals,
    dominant_colors: Vec<Color>,
    labels: UniqueLabels,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one image into the running totals.
    ///
    /// Fails if the image has no dominant colors, since every image must
    /// contribute one to the color reduction.
    pub fn add(&mut self, image: &Image) -> Result<()> {
        let dominant = colors::most_dominant(&image.annotation.dominant_colors).ok_or_else(|| {
            anyhow::anyhow!("Malformed image record {}: no dominant colors", image.id)
        })?;
        self.dominant_colors.push(dominant.clone());

        if let Some(face) = image.annotation.primary_face() {
            self.faces.add(face);
        }

        for label in &image.annotation.label_annotations {
            self.labels.insert(label);
        }

        Ok(())
    }

    pub fn faces(&self) -> &FaceTotals {
        &self.faces
    }

    /// Per-image dominant colors, in the order images were added.
    pub fn dominant_colors(&self) -> &[Color] {
        &self.dominant_colors
    }

    pub fn labels(&self) -> &UniqueLabels {
        &self.labels
    }

    /// Produce the summary. Fails if no image was added.
    pub fn finish(self) -> Result<Summary> {
        let most_dominant_color = colors::most_dominant(&self.dominant_colors)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Cannot summarize an empty batch"))?;

        debug!(
            images = self.dominant_colors.len(),
            faces = self.faces.count,
            unique_labels = self.labels.len(),
            "Aggregated batch"
        );

        Ok(Summary {
            most_common_emotion: self.faces.most_common_emotion(),
            most_dominant_color,
            most_common_subjects: self.labels.top(TOP_SUBJECTS),
        })
    }
}

/// Summarize a batch of annotated images.
pub fn aggregate(images: &[Image]) -> Result<Summary> {
    let mut acc = Accumulator::new();
    for image in images {
        acc.add(image)?;
    }
    acc.finish()
}
