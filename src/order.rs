// Rotation-axis and transform-operation orders

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

/// A coordinate axis a rotation can be applied around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn symbol(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            _ => None,
        }
    }

    /// Component index of this axis in a `Vec3`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One of the three affine operations composed into a model matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformOp {
    Scale,
    Rotate,
    Translate,
}

impl TransformOp {
    pub const ALL: [TransformOp; 3] = [TransformOp::Scale, TransformOp::Rotate, TransformOp::Translate];

    pub fn symbol(self) -> char {
        match self {
            TransformOp::Scale => 's',
            TransformOp::Rotate => 'r',
            TransformOp::Translate => 't',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_lowercase() {
            's' => Some(TransformOp::Scale),
            'r' => Some(TransformOp::Rotate),
            't' => Some(TransformOp::Translate),
            _ => None,
        }
    }
}

const AXIS_ALPHABET: &str = "xyz";
const OP_ALPHABET: &str = "srt";

/// Parses a three-symbol permutation. Separators (`-` and whitespace) are skipped
/// so UI spellings like `"X-Y-Z"` or `"s r t"` are accepted.
fn parse_permutation<T: Copy + PartialEq>(
    order: &str,
    kind: &'static str,
    alphabet: &'static str,
    lookup: fn(char) -> Option<T>,
    unknown_symbol: fn(char) -> Option<TransformError>,
) -> Result<[T; 3]> {
    let invalid = || TransformError::InvalidOrder {
        kind,
        order: order.to_string(),
        alphabet,
    };

    let symbols: Vec<char> = order
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if symbols.len() != 3 {
        return Err(invalid());
    }

    let mut parsed: Vec<T> = Vec::with_capacity(3);
    for symbol in symbols {
        let item = match lookup(symbol) {
            Some(item) => item,
            None => return Err(unknown_symbol(symbol).unwrap_or_else(invalid)),
        };
        if parsed.contains(&item) {
            return Err(invalid());
        }
        parsed.push(item);
    }

    Ok([parsed[0], parsed[1], parsed[2]])
}

/// Validated application order of the three per-axis rotations.
///
/// The first axis is the rotation applied to a point first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AxisOrder([Axis; 3]);

impl AxisOrder {
    pub const XYZ: AxisOrder = AxisOrder([Axis::X, Axis::Y, Axis::Z]);

    /// Every permutation, in the order the demo cycles through them.
    pub const ALL: [AxisOrder; 6] = [
        AxisOrder([Axis::X, Axis::Y, Axis::Z]),
        AxisOrder([Axis::X, Axis::Z, Axis::Y]),
        AxisOrder([Axis::Y, Axis::X, Axis::Z]),
        AxisOrder([Axis::Y, Axis::Z, Axis::X]),
        AxisOrder([Axis::Z, Axis::X, Axis::Y]),
        AxisOrder([Axis::Z, Axis::Y, Axis::X]),
    ];

    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }

    /// The permutation following this one in [`AxisOrder::ALL`], wrapping around.
    pub fn next(&self) -> AxisOrder {
        let idx = AxisOrder::ALL.iter().position(|o| o == self).unwrap_or(0);
        AxisOrder::ALL[(idx + 1) % AxisOrder::ALL.len()]
    }
}

impl Default for AxisOrder {
    fn default() -> Self {
        AxisOrder::XYZ
    }
}

impl FromStr for AxisOrder {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        parse_permutation(s, "rotation axis", AXIS_ALPHABET, Axis::from_symbol, |_| None).map(AxisOrder)
    }
}

impl TryFrom<String> for AxisOrder {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AxisOrder> for String {
    fn from(order: AxisOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.0 {
            write!(f, "{}", axis.symbol())?;
        }
        Ok(())
    }
}

/// Validated composition order of scale, rotation and translation.
///
/// The first operation is the one applied to a point first. The animator reads
/// the same order to decide which operation each of its stages animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OpOrder([TransformOp; 3]);

impl OpOrder {
    pub const SRT: OpOrder = OpOrder([TransformOp::Scale, TransformOp::Rotate, TransformOp::Translate]);

    pub const ALL: [OpOrder; 6] = [
        OpOrder([TransformOp::Scale, TransformOp::Rotate, TransformOp::Translate]),
        OpOrder([TransformOp::Scale, TransformOp::Translate, TransformOp::Rotate]),
        OpOrder([TransformOp::Rotate, TransformOp::Scale, TransformOp::Translate]),
        OpOrder([TransformOp::Rotate, TransformOp::Translate, TransformOp::Scale]),
        OpOrder([TransformOp::Translate, TransformOp::Scale, TransformOp::Rotate]),
        OpOrder([TransformOp::Translate, TransformOp::Rotate, TransformOp::Scale]),
    ];

    /// Parses an order handed to the animator. Unlike [`FromStr`], a symbol
    /// outside `s`, `r`, `t` is reported as an invalid stage label.
    pub fn parse_stages(s: &str) -> Result<Self> {
        parse_permutation(s, "transform op", OP_ALPHABET, TransformOp::from_symbol, |c| {
            Some(TransformError::InvalidStageLabel(c))
        })
        .map(OpOrder)
    }

    pub fn ops(&self) -> [TransformOp; 3] {
        self.0
    }

    pub fn get(&self, index: usize) -> TransformOp {
        self.0[index]
    }

    pub fn next(&self) -> OpOrder {
        let idx = OpOrder::ALL.iter().position(|o| o == self).unwrap_or(0);
        OpOrder::ALL[(idx + 1) % OpOrder::ALL.len()]
    }
}

impl Default for OpOrder {
    fn default() -> Self {
        OpOrder::SRT
    }
}

impl FromStr for OpOrder {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        parse_permutation(s, "transform op", OP_ALPHABET, TransformOp::from_symbol, |_| None).map(OpOrder)
    }
}

impl TryFrom<String> for OpOrder {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OpOrder> for String {
    fn from(order: OpOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for OpOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in self.0 {
            write!(f, "{}", op.symbol())?;
        }
        Ok(())
    }
}
