//! Error codes.
//!
//! Format: E#### where the first digit is the phase:
//! - E1xxx: compile errors (raised before any evaluation)
//! - E2xxx: evaluation errors (fatal to the current run)
//! - E3xxx: resource exhaustion (timeout, loop ceiling)

use std::fmt;

/// Phase an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Compile,
    Evaluation,
    ResourceExhaustion,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Compile (E1xxx)
    /// No function with this name and argument count
    E1001,
    /// Assignment or increment of something that is not a variable
    E1002,
    /// By-reference argument is not a variable
    E1003,
    /// Two case labels with the same value
    E1004,
    /// Case label is not a constant
    E1005,
    /// Numeric literal does not parse
    E1006,

    // Evaluation (E2xxx)
    /// Variable read before it was assigned
    E2001,
    /// Constant used as a variable
    E2002,
    /// `continue` outside a loop
    E2003,
    /// `break` outside a loop or switch
    E2004,
    /// Operand produced no value
    E2005,
    /// Built-in function reported an error
    E2006,
    /// Environment uses a different function registry
    E2007,
    /// Batch row length differs from the input list
    E2008,

    // Resource exhaustion (E3xxx)
    /// Deadline passed
    E3001,
    /// Loop iteration ceiling reached
    E3002,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::E1001 => "E1001",
            Self::E1002 => "E1002",
            Self::E1003 => "E1003",
            Self::E1004 => "E1004",
            Self::E1005 => "E1005",
            Self::E1006 => "E1006",
            Self::E2001 => "E2001",
            Self::E2002 => "E2002",
            Self::E2003 => "E2003",
            Self::E2004 => "E2004",
            Self::E2005 => "E2005",
            Self::E2006 => "E2006",
            Self::E2007 => "E2007",
            Self::E2008 => "E2008",
            Self::E3001 => "E3001",
            Self::E3002 => "E3002",
        }
    }

    pub const fn phase(self) -> Phase {
        match self {
            Self::E1001
            | Self::E1002
            | Self::E1003
            | Self::E1004
            | Self::E1005
            | Self::E1006 => Phase::Compile,
            Self::E2001
            | Self::E2002
            | Self::E2003
            | Self::E2004
            | Self::E2005
            | Self::E2006
            | Self::E2007
            | Self::E2008 => Phase::Evaluation,
            Self::E3001 | Self::E3002 => Phase::ResourceExhaustion,
        }
    }

    /// One-line explanation, for `--explain`-style lookups.
    pub const fn description(self) -> &'static str {
        match self {
            Self::E1001 => "no function with this name takes that many arguments",
            Self::E1002 => "only variables can be assigned, incremented or decremented",
            Self::E1003 => "this argument is passed by reference and must be a variable",
            Self::E1004 => "a switch has two cases with the same value",
            Self::E1005 => "case labels must be constant",
            Self::E1006 => "numeric literal is malformed",
            Self::E2001 => "variable was read before it was assigned",
            Self::E2002 => "a constant cannot be used as a variable",
            Self::E2003 => "continue is only valid inside a loop",
            Self::E2004 => "break is only valid inside a loop or switch",
            Self::E2005 => "a value was required but the expression produced none",
            Self::E2006 => "a built-in function failed",
            Self::E2007 => "expression compiled against a different function registry",
            Self::E2008 => "a batch row does not supply exactly one value per input",
            Self::E3001 => "calculations exceeded the time limit",
            Self::E3002 => "a loop exceeded its iteration limit",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
