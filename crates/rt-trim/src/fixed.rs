//! Fixed pitch: the disk runs at configured angles, no trim iteration.

use crate::dictionary::Dictionary;
use crate::error::TrimResult;
use crate::pitch::{PerCellPitch, PitchAngles};
use crate::strategy::{TrimContext, TrimStrategy};
use rt_core::{Vec3, deg_to_rad};

pub const TYPE_NAME: &str = "fixedTrim";

pub struct FixedTrim {
    ctx: TrimContext,
    theta: PitchAngles,
    pitch: Vec<f64>,
}

impl FixedTrim {
    pub fn new(ctx: TrimContext) -> Self {
        Self {
            ctx,
            theta: PitchAngles::default(),
            pitch: Vec::new(),
        }
    }

    pub fn boxed(ctx: TrimContext) -> Box<dyn TrimStrategy> {
        Box::new(Self::new(ctx))
    }
}

impl TrimStrategy for FixedTrim {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn read(&mut self, dict: &Dictionary) -> TrimResult<()> {
        let coeffs = dict.optional_coeffs(TYPE_NAME)?;
        let angles = coeffs.sub_dict("pitchAngles")?;

        let theta0: f64 = angles.lookup("theta0")?;
        let theta1c: f64 = angles.lookup("theta1c")?;
        let theta1s: f64 = angles.lookup("theta1s")?;

        self.theta = PitchAngles::new(deg_to_rad(theta0), deg_to_rad(theta1c), deg_to_rad(theta1s));
        Ok(())
    }

    /// Evaluate the disk once at the fixed angles, every step.
    fn correct(&mut self, _time_index: u64, velocity: &[Vec3], force: &mut [Vec3]) {
        let rotor = self.ctx.rotor.as_ref();
        PerCellPitch::new(self.theta, rotor.geometry()).fill(&mut self.pitch);
        rotor.calculate(velocity, &self.pitch, force);
    }

    fn pitch_angles(&self) -> PitchAngles {
        self.theta
    }

    fn per_cell_pitch(&self) -> PerCellPitch<'_> {
        PerCellPitch::new(self.theta, self.ctx.rotor.geometry())
    }
}
