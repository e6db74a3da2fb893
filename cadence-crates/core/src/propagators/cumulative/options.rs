/// The options which influence the filtering of the generalized cumulative propagator.
#[derive(Debug, Clone, Copy)]
pub struct GeneralizedCumulativeOptions {
    /// Specifies whether optional activities which are needed to reach the minimum capacity (or to
    /// compensate an overload with a negative height) are forced to be present; this detection
    /// only has an effect on resources with a minimum capacity or with negative heights.
    pub mandatory_part_detection: bool,
    /// Specifies whether the heights and the maximum lengths of the activities are tightened
    /// based on the profile. When disabled, only the start and end times are filtered.
    pub height_and_length_filtering: bool,
}

impl Default for GeneralizedCumulativeOptions {
    fn default() -> Self {
        GeneralizedCumulativeOptions {
            mandatory_part_detection: true,
            height_and_length_filtering: true,
        }
    }
}

impl GeneralizedCumulativeOptions {
    pub fn new(mandatory_part_detection: bool, height_and_length_filtering: bool) -> Self {
        GeneralizedCumulativeOptions {
            mandatory_part_detection,
            height_and_length_filtering,
        }
    }
}
