//! Drive configuration surface.
//!
//! Plain data handed to [`crate::layout::plan_drive`]. Defaults mirror a
//! common half-inch-pitch setup: a 24T/48T pair, 7.9 tooth height, and an
//! auto center distance derived from a 120-link belt.

use crate::float_types::Real;
use crate::links::LinkCountSource;
use crate::pulley::BeltGeometry;
use crate::ratio::RatioSearch;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the tooth-count pair is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ToothSelection {
    /// Caller supplies both counts.
    Manual {
        /// Teeth on the driving pulley.
        drive_teeth: u32,
        /// Teeth on the driven pulley.
        driven_teeth: u32,
    },
    /// Counts come from the ratio solver.
    FromRatio(RatioSearch),
}

/// Where the center distance comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CenterDistanceSource {
    /// Derived from a belt of this many links via the belt-length
    /// approximation.
    FromBeltLinks(u32),
    /// A caller-measured distance.
    Manual(Real),
}

/// Full configuration for one transmission layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// Tooth-count pair, manual or ratio-solved.
    pub tooth_selection: ToothSelection,
    /// Belt profile shared by both pulleys.
    pub belt: BeltGeometry,
    /// Axial thickness of each pulley body.
    pub pulley_thickness: Real,
    /// Axial width of the belt.
    pub belt_width: Real,
    /// Drive pulley bore diameter, zero for a solid hub.
    pub drive_bore_diameter: Real,
    /// Driven pulley bore diameter, zero for a solid hub.
    pub driven_bore_diameter: Real,
    /// Center-distance source.
    pub center_distance: CenterDistanceSource,
    /// Belt element count source.
    pub link_count: LinkCountSource,
    /// Bump odd element counts to the next even number.
    pub enforce_even_links: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            tooth_selection: ToothSelection::Manual {
                drive_teeth: 24,
                driven_teeth: 48,
            },
            belt: BeltGeometry::default(),
            pulley_thickness: 6.0,
            belt_width: 6.0,
            drive_bore_diameter: 8.0,
            driven_bore_diameter: 8.0,
            center_distance: CenterDistanceSource::FromBeltLinks(120),
            link_count: LinkCountSource::Auto,
            enforce_even_links: true,
        }
    }
}

impl DriveConfig {
    /// Set both tooth counts directly.
    #[must_use]
    pub const fn with_tooth_counts(mut self, drive_teeth: u32, driven_teeth: u32) -> Self {
        self.tooth_selection = ToothSelection::Manual {
            drive_teeth,
            driven_teeth,
        };
        self
    }

    /// Let the ratio solver pick the tooth counts.
    #[must_use]
    pub const fn with_ratio_search(mut self, search: RatioSearch) -> Self {
        self.tooth_selection = ToothSelection::FromRatio(search);
        self
    }

    /// Replace the belt profile.
    #[must_use]
    pub const fn with_belt(mut self, belt: BeltGeometry) -> Self {
        self.belt = belt;
        self
    }

    /// Use a measured center distance.
    #[must_use]
    pub const fn with_manual_center_distance(mut self, distance: Real) -> Self {
        self.center_distance = CenterDistanceSource::Manual(distance);
        self
    }

    /// Derive the center distance from a belt of `links` elements.
    #[must_use]
    pub const fn with_belt_links(mut self, links: u32) -> Self {
        self.center_distance = CenterDistanceSource::FromBeltLinks(links);
        self
    }

    /// Use a fixed belt element count instead of deriving one.
    #[must_use]
    pub const fn with_manual_link_count(mut self, count: u32) -> Self {
        self.link_count = LinkCountSource::Manual(count);
        self
    }

    /// Toggle even-count enforcement.
    #[must_use]
    pub const fn with_enforce_even_links(mut self, enforce: bool) -> Self {
        self.enforce_even_links = enforce;
        self
    }

    /// Set both bore diameters.
    #[must_use]
    pub const fn with_bore_diameters(mut self, drive: Real, driven: Real) -> Self {
        self.drive_bore_diameter = drive;
        self.driven_bore_diameter = driven;
        self
    }

    /// The ratio search, when tooth selection is ratio-driven.
    #[must_use]
    pub const fn ratio_search(&self) -> Option<&RatioSearch> {
        match &self.tooth_selection {
            ToothSelection::FromRatio(search) => Some(search),
            ToothSelection::Manual { .. } => None,
        }
    }
}
