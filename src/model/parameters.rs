//! Print parameters and the enumerated print settings
//!
//! `PrintParameters` is the full set of inputs the slicing stage needs. It is
//! constructed either from caller-supplied values (mesh formats) or extracted
//! from package metadata (package format), never a blend of both for a
//! single field.

/// Infill lattice pattern, as understood by the slicing engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum InfillPattern {
    AdaptiveCubic,
    AlignedRectilinear,
    ArchimedeanChords,
    Concentric,
    Cross3d,
    CrossHatch,
    CrossZag,
    Cubic,
    Grid,
    Gyroid,
    HilbertCurve,
    Honeycomb,
    Honeycomb3d,
    Lightning,
    Line,
    LockedZag,
    OctagramSpiral,
    Rectilinear,
    SupportCubic,
    Triangles,
    TriHexagon,
    ZigZag,
}

impl InfillPattern {
    /// The value written to profiles and command lines
    pub fn as_str(&self) -> &'static str {
        match self {
            InfillPattern::AdaptiveCubic => "adaptivecubic",
            InfillPattern::AlignedRectilinear => "alignedrectilinear",
            InfillPattern::ArchimedeanChords => "archimedeanchords",
            InfillPattern::Concentric => "concentric",
            InfillPattern::Cross3d => "cross3d",
            InfillPattern::CrossHatch => "crosshatch",
            InfillPattern::CrossZag => "crosszag",
            InfillPattern::Cubic => "cubic",
            InfillPattern::Grid => "grid",
            InfillPattern::Gyroid => "gyroid",
            InfillPattern::HilbertCurve => "hilbertcurve",
            InfillPattern::Honeycomb => "honeycomb",
            InfillPattern::Honeycomb3d => "honeycomb3d",
            InfillPattern::Lightning => "lightning",
            InfillPattern::Line => "line",
            InfillPattern::LockedZag => "lockedzag",
            InfillPattern::OctagramSpiral => "octagramspiral",
            InfillPattern::Rectilinear => "rectilinear",
            InfillPattern::SupportCubic => "supportcubic",
            InfillPattern::Triangles => "triangles",
            InfillPattern::TriHexagon => "trihexagon",
            InfillPattern::ZigZag => "zigzag",
        }
    }

    /// All known patterns
    pub const ALL: [InfillPattern; 22] = [
        InfillPattern::AdaptiveCubic,
        InfillPattern::AlignedRectilinear,
        InfillPattern::ArchimedeanChords,
        InfillPattern::Concentric,
        InfillPattern::Cross3d,
        InfillPattern::CrossHatch,
        InfillPattern::CrossZag,
        InfillPattern::Cubic,
        InfillPattern::Grid,
        InfillPattern::Gyroid,
        InfillPattern::HilbertCurve,
        InfillPattern::Honeycomb,
        InfillPattern::Honeycomb3d,
        InfillPattern::Lightning,
        InfillPattern::Line,
        InfillPattern::LockedZag,
        InfillPattern::OctagramSpiral,
        InfillPattern::Rectilinear,
        InfillPattern::SupportCubic,
        InfillPattern::Triangles,
        InfillPattern::TriHexagon,
        InfillPattern::ZigZag,
    ];

    /// Parse a profile value, case-insensitively
    ///
    /// Returns `None` for an unknown value; extraction falls back to a
    /// default rather than failing the request.
    pub fn from_value(value: &str) -> Option<Self> {
        let lower = value.to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == lower)
    }
}

/// Brim style around the model's base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrimStyle {
    /// Let the slicer decide
    Auto,
    /// No brim
    None,
    /// Caller-specified width
    Custom,
}

impl BrimStyle {
    /// The value written to profiles and command lines
    pub fn as_str(&self) -> &'static str {
        match self {
            BrimStyle::Auto => "auto",
            BrimStyle::None => "none",
            BrimStyle::Custom => "custom",
        }
    }

    /// Parse a profile value, case-insensitively
    pub fn from_value(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "auto" => Some(BrimStyle::Auto),
            "none" => Some(BrimStyle::None),
            "custom" => Some(BrimStyle::Custom),
            _ => None,
        }
    }
}

/// Seam placement strategy for contour start/stop points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SeamPosition {
    Random,
    Aligned,
    Nearest,
    Rear,
    Custom,
}

impl SeamPosition {
    /// The value written to profiles and command lines
    pub fn as_str(&self) -> &'static str {
        match self {
            SeamPosition::Random => "random",
            SeamPosition::Aligned => "aligned",
            SeamPosition::Nearest => "nearest",
            SeamPosition::Rear => "rear",
            SeamPosition::Custom => "custom",
        }
    }

    /// Parse a profile value, case-insensitively
    pub fn from_value(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "random" => Some(SeamPosition::Random),
            "aligned" => Some(SeamPosition::Aligned),
            "nearest" => Some(SeamPosition::Nearest),
            "rear" => Some(SeamPosition::Rear),
            "custom" => Some(SeamPosition::Custom),
            _ => None,
        }
    }
}

/// The full set of inputs the slicing stage needs
#[derive(Debug, Clone, PartialEq)]
pub struct PrintParameters {
    /// Printing technology, uppercase (e.g. "FDM")
    pub technology: String,
    /// Material, uppercase canonical name (e.g. "PLA")
    pub material: String,
    /// Layer height in millimeters
    pub layer_height: f64,
    /// Number of solid perimeter walls
    pub shells: u32,
    /// Interior fill percentage
    pub infill: u32,
    /// Whether support material is generated
    pub supports: bool,
    /// Solid layers closing the top of the model
    pub top_shell_layers: Option<u32>,
    /// Solid layers closing the bottom of the model
    pub bottom_shell_layers: Option<u32>,
    /// Infill lattice pattern
    pub infill_pattern: Option<InfillPattern>,
    /// Brim style
    pub brim_style: Option<BrimStyle>,
    /// Brim width in millimeters
    pub brim_width: Option<u32>,
    /// Seam placement
    pub seam: Option<SeamPosition>,
    /// Layer numbers at which a filament color change is inserted
    pub color_change_layers: Vec<u32>,
    /// Whether the mesh should be reoriented before slicing
    pub auto_orient: bool,
}

impl PrintParameters {
    /// Build a parameter set from the mandatory fields
    ///
    /// Secondary fields start unset and can be filled in afterwards.
    pub fn new(
        technology: impl Into<String>,
        material: impl Into<String>,
        layer_height: f64,
        shells: u32,
        infill: u32,
        supports: bool,
    ) -> Self {
        Self {
            technology: technology.into(),
            material: material.into(),
            layer_height,
            shells,
            infill,
            supports,
            top_shell_layers: None,
            bottom_shell_layers: None,
            infill_pattern: None,
            brim_style: None,
            brim_width: None,
            seam: None,
            color_change_layers: Vec::new(),
            auto_orient: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infill_pattern_round_trip() {
        for pattern in InfillPattern::ALL {
            assert_eq!(InfillPattern::from_value(pattern.as_str()), Some(pattern));
        }
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!(InfillPattern::from_value("GYROID"), Some(InfillPattern::Gyroid));
        assert_eq!(BrimStyle::from_value("Auto"), Some(BrimStyle::Auto));
        assert_eq!(SeamPosition::from_value("REAR"), Some(SeamPosition::Rear));
    }

    #[test]
    fn test_unknown_values_parse_to_none() {
        assert_eq!(InfillPattern::from_value("spiral-of-doom"), None);
        assert_eq!(BrimStyle::from_value("wide"), None);
        assert_eq!(SeamPosition::from_value("front"), None);
    }

    #[test]
    fn test_new_leaves_secondary_fields_unset() {
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        assert_eq!(params.top_shell_layers, None);
        assert_eq!(params.infill_pattern, None);
        assert!(params.color_change_layers.is_empty());
        assert!(!params.auto_orient);
    }
}
