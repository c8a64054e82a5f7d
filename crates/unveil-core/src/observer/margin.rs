//! CSS-style root margins ("0px 0px -50px 0px") applied to the viewport
//! before intersection testing.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::{Error, Result};

/// A single side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f64),
    /// Percentage of the viewport extent along the same axis
    Percent(f64),
}

impl MarginValue {
    /// Resolve to pixels against the viewport extent of the matching axis
    #[inline]
    pub fn resolve(&self, extent: f64) -> f64 {
        match self {
            MarginValue::Px(px) => *px,
            MarginValue::Percent(pct) => extent * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        let re = TOKEN.get_or_init(|| {
            Regex::new(r"^([+-]?\d+(?:\.\d+)?|[+-]?\.\d+)(px|%)?$").expect("static regex")
        });

        let caps = re.captures(token)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        match caps.get(2).map(|m| m.as_str()) {
            Some("px") => Some(MarginValue::Px(value)),
            Some("%") => Some(MarginValue::Percent(value)),
            // Unitless values are only valid for zero
            _ if value == 0.0 => Some(MarginValue::Px(0.0)),
            _ => None,
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{}px", px),
            MarginValue::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Four-sided viewport adjustment; positive values grow the viewport,
/// negative values shrink it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Default for RootMargin {
    /// `0px 0px -50px 0px`: reveal once the element is 50px above the fold
    fn default() -> Self {
        Self::bottom_inset(50.0)
    }
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: MarginValue::Px(0.0),
        right: MarginValue::Px(0.0),
        bottom: MarginValue::Px(0.0),
        left: MarginValue::Px(0.0),
    };

    /// Margin that pulls only the bottom edge of the viewport up by `px`
    pub fn bottom_inset(px: f64) -> Self {
        Self {
            bottom: MarginValue::Px(-px),
            ..Self::ZERO
        }
    }

    /// Parse the CSS shorthand with one to four values
    pub fn parse(input: &str) -> Result<Self> {
        let values = input
            .split_whitespace()
            .map(|token| {
                MarginValue::parse(token)
                    .ok_or_else(|| Error::InvalidRootMargin(format!("bad value '{}' in '{}'", token, input)))
            })
            .collect::<Result<Vec<_>>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => {
                return Err(Error::InvalidRootMargin(format!(
                    "expected 1 to 4 values, got {} in '{}'",
                    values.len(),
                    input
                )))
            }
        };

        Ok(Self { top, right, bottom, left })
    }

    /// Grow (or shrink) the viewport by this margin
    pub fn apply(&self, viewport: &Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);
        let right = self.right.resolve(viewport.width);

        Rect::new(
            viewport.x - left,
            viewport.y - top,
            (viewport.width + left + right).max(0.0),
            (viewport.height + top + bottom).max(0.0),
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RootMargin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}
