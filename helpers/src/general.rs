use std::error::Error;
use std::fmt;

/// InputValueError is used if some playback option does not fulfill the posed requirements, e.g.,
/// a non-positive step interval.
#[derive(Debug, Clone)]
pub struct InputValueError {
    pub msg: String,
}

impl InputValueError {
    pub fn new(msg: &str) -> InputValueError {
        InputValueError {
            msg: msg.to_owned(),
        }
    }
}

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value: {}", self.msg)
    }
}

impl Error for InputValueError {}

/// max returns the maximum value in the array x. None is returned for an empty array.
pub fn max<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> Option<T> {
    let first = *x.first()?;
    Some(x.iter().fold(
        first,
        |val_max, &val| {
            if val_max > val {
                val_max
            } else {
                val
            }
        },
    ))
}

/// min returns the minimum value in the array x. None is returned for an empty array.
pub fn min<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> Option<T> {
    let first = *x.first()?;
    Some(x.iter().fold(
        first,
        |val_min, &val| {
            if val_min < val {
                val_min
            } else {
                val
            }
        },
    ))
}
