// Running totals over the first face of each image.
//
// Only the four emotion sums reach the summary today. The remaining totals
// (attributes, angles, confidence, corner fractions) are kept so a richer
// face report can be built from the same pass later.

use crate::models::{Corner, Emotion, FaceAnnotation};

/// Summed likelihood weights for each reportable emotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionTotals {
    pub anger: u32,
    pub joy: u32,
    pub sorrow: u32,
    pub surprise: u32,
}

impl EmotionTotals {
    pub fn get(&self, emotion: Emotion) -> u32 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Joy => self.joy,
            Emotion::Sorrow => self.sorrow,
            Emotion::Surprise => self.surprise,
        }
    }

    /// The emotion with the strictly highest total.
    ///
    /// Walks `Emotion::ALL` in order and only replaces the leader when beaten,
    /// so ties resolve to the earliest of anger, joy, sorrow, surprise.
    pub fn leader(&self) -> Emotion {
        let mut leader = Emotion::ALL[0];
        for emotion in Emotion::ALL.into_iter().skip(1) {
            if self.get(emotion) > self.get(leader) {
                leader = emotion;
            }
        }
        leader
    }
}

/// Summed weights for the non-emotion face attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeTotals {
    pub blurred: u32,
    pub headwear: u32,
    pub underexposed: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleTotals {
    pub pan_sum: f64,
    pub roll_sum: f64,
    pub tilt_sum: f64,
}

/// Summed fractions for one bounding-box corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerTotals {
    pub x_fraction_sum: f64,
    pub y_fraction_sum: f64,
}

impl CornerTotals {
    fn add(&mut self, corner: &Corner) {
        self.x_fraction_sum += corner.x_fraction;
        self.y_fraction_sum += corner.y_fraction;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceTotals {
    /// Number of images that contributed a face.
    pub count: u32,
    pub emotions: EmotionTotals,
    pub attributes: AttributeTotals,
    pub angles: AngleTotals,
    pub confidence_sum: f64,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub bounds: [CornerTotals; 4],
}

impl FaceTotals {
    pub fn add(&mut self, face: &FaceAnnotation) {
        self.count += 1;

        self.emotions.anger += face.anger_likelihood.weight();
        self.emotions.joy += face.joy_likelihood.weight();
        self.emotions.sorrow += face.sorrow_likelihood.weight();
        self.emotions.surprise += face.surprise_likelihood.weight();

        self.attributes.blurred += face.blurred_likelihood.weight();
        self.attributes.headwear += face.headwear_likelihood.weight();
        self.attributes.underexposed += face.under_exposed_likelihood.weight();

        self.confidence_sum += face.detection_confidence;

        self.angles.pan_sum += face.pan_angle;
        self.angles.roll_sum += face.roll_angle;
        self.angles.tilt_sum += face.tilt_angle;

        for (totals, corner) in self.bounds.iter_mut().zip(&face.bounds) {
            totals.add(corner);
        }
    }

    /// `None` until at least one face has been counted.
    pub fn most_common_emotion(&self) -> Option<Emotion> {
        (self.count > 0).then(|| self.emotions.leader())
    }
}
