use serde::{Deserialize, Serialize};

/// Concrete type of a region.
///
/// The type decides how a region reacts to being attached to a parent (see
/// [`Region::set_building`](super::Region::set_building) and [`Region::set_floor`](super::Region::set_floor))
/// and is stored in the interchange format as the `type` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Region without a specific meaning.
    #[default]
    Generic,
    /// Outdoor area containing one or more buildings.
    BuildingSite,
    /// Building with a geographic footprint.
    Building,
    /// Storey of a building.
    Floor,
    /// Room on a floor.
    Room,
    /// Corridor on a floor.
    Corridor,
    /// Hallway on a floor.
    Hallway,
    /// Abstract zone on a floor.
    Zone,
    /// Stairs, elevator or ramp connecting floors.
    VerticalPassage,
    /// IndoorGML cell space on a floor.
    CellSpace,
    /// Type registered by the application.
    Other(String),
}

impl RegionKind {
    const BUILTIN: [RegionKind; 10] = [
        RegionKind::Generic,
        RegionKind::BuildingSite,
        RegionKind::Building,
        RegionKind::Floor,
        RegionKind::Room,
        RegionKind::Corridor,
        RegionKind::Hallway,
        RegionKind::Zone,
        RegionKind::VerticalPassage,
        RegionKind::CellSpace,
    ];

    /// Tag used in the interchange format.
    pub fn tag(&self) -> &str {
        match self {
            RegionKind::Generic => "Region",
            RegionKind::BuildingSite => "BuildingSite",
            RegionKind::Building => "Building",
            RegionKind::Floor => "Floor",
            RegionKind::Room => "Room",
            RegionKind::Corridor => "Corridor",
            RegionKind::Hallway => "Hallway",
            RegionKind::Zone => "Zone",
            RegionKind::VerticalPassage => "VerticalPassage",
            RegionKind::CellSpace => "CellSpace",
            RegionKind::Other(tag) => tag,
        }
    }

    /// Built-in kind with the given tag, or [`RegionKind::Other`].
    pub fn from_tag(tag: &str) -> Self {
        Self::BUILTIN
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .unwrap_or_else(|| RegionKind::Other(tag.to_string()))
    }

    /// All built-in kinds.
    pub fn builtin() -> impl Iterator<Item = RegionKind> {
        Self::BUILTIN.into_iter()
    }

    /// Returns true for kinds that live on a floor and take over its ceiling height.
    pub fn is_floor_space(&self) -> bool {
        matches!(
            self,
            RegionKind::Room
                | RegionKind::Corridor
                | RegionKind::Hallway
                | RegionKind::Zone
                | RegionKind::VerticalPassage
                | RegionKind::CellSpace
        )
    }
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
