//! Shape guide formulas.
//!
//! A guide formula is a whitespace separated operator followed by up to
//! three operands (`"*/ w adj 100000"`). Operands are resolved through a
//! [`Context`]; missing operands are 0.

use super::context::Context;
use crate::common::error::{Error, Result};
use once_cell::unsync::OnceCell;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Angle unit of guide formulas: 60000ths of a degree.
pub const OOXML_DEGREE: f64 = 60_000.0;

/// Guide formula operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideOp {
    MulDiv,
    AddSub,
    AddDiv,
    IfElse,
    Val,
    Abs,
    Sqrt,
    Max,
    Min,
    At2,
    Sin,
    Cos,
    Tan,
    Cat2,
    Sat2,
    Pin,
    Mod,
}

static OPERATORS: phf::Map<&'static str, GuideOp> = phf_map! {
    "*/" => GuideOp::MulDiv,
    "+-" => GuideOp::AddSub,
    "+/" => GuideOp::AddDiv,
    "?:" => GuideOp::IfElse,
    "muldiv" => GuideOp::MulDiv,
    "addsub" => GuideOp::AddSub,
    "adddiv" => GuideOp::AddDiv,
    "ifelse" => GuideOp::IfElse,
    "val" => GuideOp::Val,
    "abs" => GuideOp::Abs,
    "sqrt" => GuideOp::Sqrt,
    "max" => GuideOp::Max,
    "min" => GuideOp::Min,
    "at2" => GuideOp::At2,
    "sin" => GuideOp::Sin,
    "cos" => GuideOp::Cos,
    "tan" => GuideOp::Tan,
    "cat2" => GuideOp::Cat2,
    "sat2" => GuideOp::Sat2,
    "pin" => GuideOp::Pin,
    "mod" => GuideOp::Mod,
};

impl GuideOp {
    /// Look up an operator token, aliases included.
    pub fn parse(token: &str) -> Option<Self> {
        OPERATORS.get(token).copied()
    }

    /// Apply the operator to resolved operands.
    pub fn apply(self, x: f64, y: f64, z: f64) -> f64 {
        match self {
            Self::Abs => x.abs(),
            Self::AddDiv => {
                if z == 0.0 {
                    0.0
                } else {
                    (x + y) / z
                }
            },
            Self::AddSub => (x + y) - z,
            Self::At2 => y.atan2(x).to_degrees() * OOXML_DEGREE,
            Self::Cos => x * (y / OOXML_DEGREE).to_radians().cos(),
            Self::Cat2 => x * z.atan2(y).cos(),
            Self::IfElse => {
                if x > 0.0 {
                    y
                } else {
                    z
                }
            },
            Self::Val => x,
            Self::Max => x.max(y),
            Self::Min => x.min(y),
            Self::Mod => (x * x + y * y + z * z).sqrt(),
            Self::MulDiv => {
                if z == 0.0 {
                    0.0
                } else {
                    (x * y) / z
                }
            },
            Self::Pin => x.max(y.min(z)),
            Self::Sat2 => x * z.atan2(y).sin(),
            Self::Sin => x * (y / OOXML_DEGREE).to_radians().sin(),
            Self::Sqrt => x.sqrt(),
            Self::Tan => x * (y / OOXML_DEGREE).to_radians().tan(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedFormula {
    op: GuideOp,
    operands: SmallVec<[String; 3]>,
}

/// A named guide formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub name: String,
    #[serde(rename = "fmla")]
    pub formula: String,
    #[serde(skip)]
    parsed: OnceCell<ParsedFormula>,
}

impl PartialEq for Guide {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.formula == other.formula
    }
}

impl Guide {
    pub fn new(name: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formula: formula.into(),
            parsed: OnceCell::new(),
        }
    }

    fn parsed(&self) -> Result<&ParsedFormula> {
        self.parsed.get_or_try_init(|| {
            let mut tokens = self.formula.split_whitespace();
            let token = tokens.next().unwrap_or_default();
            let op = GuideOp::parse(token).ok_or_else(|| Error::UnknownGuideOperator {
                guide: self.name.clone(),
                op: token.to_string(),
            })?;
            Ok(ParsedFormula {
                op,
                operands: tokens.take(3).map(str::to_string).collect(),
            })
        })
    }

    /// The formula operator; fails for operators outside the guide language.
    pub fn op(&self) -> Result<GuideOp> {
        self.parsed().map(|parsed| parsed.op)
    }

    /// Evaluate the formula; operands are resolved through `ctx`.
    pub fn evaluate(&self, ctx: &mut Context<'_>) -> Result<f64> {
        let parsed = self.parsed()?;
        let mut args = [0.0; 3];
        for (arg, operand) in args.iter_mut().zip(&parsed.operands) {
            *arg = ctx.get_value(operand)?;
        }
        let [x, y, z] = args;
        Ok(parsed.op.apply(x, y, z))
    }
}
