//! Integer lattice coordinates and their key encodings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{IVec3, Vec3};

/// Lattice axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit step along this axis
    pub fn unit(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }

    /// The two axes perpendicular to this one
    pub fn perpendicular(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

/// The 26 offsets of the 3×3×3 neighbourhood, origin excluded.
pub const NEIGHBOR_OFFSETS_26: [IVec3; 26] = {
    let mut out = [IVec3::ZERO; 26];
    let mut i = 0;
    let mut n = 0;
    while n < 27 {
        let x = (n % 3) as i32 - 1;
        let y = ((n / 3) % 3) as i32 - 1;
        let z = (n / 9) as i32 - 1;
        if x != 0 || y != 0 || z != 0 {
            out[i] = IVec3::new(x, y, z);
            i += 1;
        }
        n += 1;
    }
    out
};

/// Integer coordinate of a voxel in the lattice
///
/// Orders lexicographically by (x, y, z), which keeps exports stable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const ORIGIN: VoxelCoord = VoxelCoord { x: 0, y: 0, z: 0 };

    /// Create a new voxel coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Lattice cell containing a continuous point
    pub fn from_point(p: Vec3) -> Self {
        Self::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Coordinate shifted by `offset`
    pub fn offset(self, offset: IVec3) -> Self {
        Self::new(
            self.x.wrapping_add(offset.x),
            self.y.wrapping_add(offset.y),
            self.z.wrapping_add(offset.z),
        )
    }

    /// Coordinate shifted by `steps` along `axis`
    pub fn step(self, axis: Axis, steps: i32) -> Self {
        self.offset(axis.unit() * steps)
    }

    /// All 26 neighbours
    pub fn neighbors(self) -> impl Iterator<Item = VoxelCoord> {
        NEIGHBOR_OFFSETS_26.into_iter().map(move |o| self.offset(o))
    }

    /// Map key in the `x/y/z` text form
    pub fn encode(self) -> String {
        self.to_string()
    }

    /// Inverse of [`VoxelCoord::encode`]
    pub fn decode(key: &str) -> Result<Self, Error> {
        key.parse()
    }

    /// Pack into one integer, 32 bits per component.
    pub fn pack(self) -> u128 {
        ((self.x as u32 as u128) << 64) | ((self.y as u32 as u128) << 32) | (self.z as u32 as u128)
    }

    /// Inverse of [`VoxelCoord::pack`]; bits above 96 are ignored.
    pub fn unpack(packed: u128) -> Self {
        Self::new(
            (packed >> 64) as u32 as i32,
            (packed >> 32) as u32 as i32,
            packed as u32 as i32,
        )
    }
}

impl From<IVec3> for VoxelCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.x, self.y, self.z)
    }
}

impl FromStr for VoxelCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let mut next = || -> Result<i32, Error> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| Error::InvalidCoordinateKey(s.to_string()))
        };
        let coord = VoxelCoord::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(Error::InvalidCoordinateKey(s.to_string()));
        }
        Ok(coord)
    }
}
