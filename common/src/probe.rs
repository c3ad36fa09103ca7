use std::fmt;

/// Share of echo requests that got no reply, in percent.
///
/// `100` also stands for "the probe could not be completed at all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Loss(u8);

impl Loss {
    pub const NONE: Loss = Loss(0);
    pub const TOTAL: Loss = Loss(100);

    /// Returns `None` for values above 100.
    pub fn new(percent: u8) -> Option<Self> {
        (percent <= 100).then_some(Self(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn status(self) -> Status {
        match self.0 {
            0 => Status::Success,
            100 => Status::Failed,
            _ => Status::Partial,
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Three-way reading of a [`Loss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Success,
    Partial,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Success => "Success",
            Status::Partial => "Partial",
            Status::Failed => "Failed",
        };
        f.write_str(label)
    }
}
