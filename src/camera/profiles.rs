#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera preferred, any camera accepted.
    IdealEnvironment,
    /// Rear camera required.
    Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub ideal: u32,
    pub max: u32,
}

/// One capture request. `None` everywhere means "any camera".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintProfile {
    pub facing: Option<Facing>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<FrameRate>,
}

impl ConstraintProfile {
    pub fn any_camera() -> Self {
        Self {
            facing: None,
            resolution: None,
            frame_rate: None,
        }
    }
}

pub const FULL_HD: Resolution = Resolution {
    ideal_width: 1920,
    ideal_height: 1080,
};

pub const SCAN_FRAME_RATE: FrameRate = FrameRate { ideal: 30, max: 60 };

/// Most specific first; negotiation takes the first one the device accepts.
pub fn default_profiles() -> Vec<ConstraintProfile> {
    vec![
        ConstraintProfile {
            facing: Some(Facing::IdealEnvironment),
            resolution: Some(FULL_HD),
            frame_rate: Some(SCAN_FRAME_RATE),
        },
        ConstraintProfile {
            facing: Some(Facing::IdealEnvironment),
            resolution: Some(Resolution {
                ideal_width: 1600,
                ideal_height: 1200,
            }),
            frame_rate: None,
        },
        ConstraintProfile {
            facing: Some(Facing::Environment),
            resolution: None,
            frame_rate: None,
        },
        ConstraintProfile::any_camera(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_degrade_to_any_camera() {
        let profiles = default_profiles();
        assert_eq!(profiles.len(), 4);
        assert_eq!(profiles[0].resolution, Some(FULL_HD));
        assert_eq!(profiles[0].frame_rate, Some(SCAN_FRAME_RATE));
        assert_eq!(profiles.last(), Some(&ConstraintProfile::any_camera()));
    }
}
