use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Largest number of CPU bursts a generated process can carry
pub const MAX_BURSTS: usize = 32;
/// Smallest value a burst estimate may take
pub const MIN_TAU: usize = 1;
/// Number of distinct process ids (`A0` .. `Z9`)
pub const MAX_PROCESSES: usize = 26 * 10;

/// A point on the simulation clock, in milliseconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(usize);

impl Timestamp {
    /// Creates a new Timestamp object
    ///
    /// * `time` - inital value of the Timestamp
    pub fn new(time: usize) -> Timestamp {
        Timestamp(time)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, or 0 if `earlier` is in the future
    pub fn since(&self, earlier: Timestamp) -> usize {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<usize> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: usize) -> Self::Output {
        Timestamp::new(self.0 + rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Two character process label, a letter followed by a digit
///
/// Ordering compares the letter first and the digit second, which gives the
/// deterministic tie-break used by the sorted ready queues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId {
    letter: u8,
    number: u8,
}

impl ProcessId {
    /// Builds the id of the `index`-th generated process (A0..A9, B0..B9, ...)
    ///
    /// * `index` - zero based position of the process in the process set
    pub fn from_index(index: usize) -> Result<ProcessId, SimError> {
        if index >= MAX_PROCESSES {
            return Err(SimError::Config(format!(
                "process index {} exceeds the {} available ids",
                index, MAX_PROCESSES
            )));
        }

        Ok(ProcessId {
            letter: b'A' + (index / 10) as u8,
            number: (index % 10) as u8,
        })
    }

    pub fn letter(&self) -> char {
        self.letter as char
    }

    pub fn number(&self) -> u8 {
        self.number
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter as char, self.number)
    }
}

impl FromStr for ProcessId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [letter @ b'A'..=b'Z', digit @ b'0'..=b'9'] => Ok(ProcessId {
                letter: *letter,
                number: digit - b'0',
            }),
            _ => Err(SimError::Config(format!("malformed process id {:?}", s))),
        }
    }
}

impl Serialize for ProcessId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProcessId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Classification fixed at generation time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessClass {
    CpuBound,
    IoBound,
}

impl ProcessClass {
    pub fn from_cpu_bound(is_cpu_bound: bool) -> ProcessClass {
        if is_cpu_bound {
            ProcessClass::CpuBound
        } else {
            ProcessClass::IoBound
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessClass::CpuBound => "CPU-bound",
            ProcessClass::IoBound => "I/O-bound",
        }
    }
}

/// Smoothing factor for burst estimates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Alpha {
    /// Exponential averaging with a weight in `[0, 1]`
    Smoothed(f64),
    /// The `-1` sentinel: use the true burst length instead of an estimate
    Actual,
}

impl Alpha {
    /// Interprets a raw command line value
    ///
    /// * `value` - `-1` or a weight in `[0, 1]`
    pub fn new(value: f64) -> Result<Alpha, SimError> {
        if value == -1.0 {
            return Ok(Alpha::Actual);
        }

        if (0.0..=1.0).contains(&value) {
            return Ok(Alpha::Smoothed(value));
        }

        Err(SimError::Config(format!(
            "alpha must be between 0 and 1 or -1, got {}",
            value
        )))
    }

    /// Rejects a smoothing weight outside `[0, 1]`
    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            Alpha::Smoothed(weight) if !(0.0..=1.0).contains(weight) => Err(SimError::Config(
                format!("alpha must be between 0 and 1 or -1, got {}", weight),
            )),
            _ => Ok(()),
        }
    }

    pub fn weight(&self) -> Option<f64> {
        match self {
            Alpha::Smoothed(weight) => Some(*weight),
            Alpha::Actual => None,
        }
    }
}
