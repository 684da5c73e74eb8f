//! Open/closed state of an accordion instance.

/// Whether the run below a header is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenState {
    #[default]
    Closed,
    Open,
}

impl OpenState {
    pub fn from_open(open: bool) -> Self {
        if open { OpenState::Open } else { OpenState::Closed }
    }

    pub fn is_open(self) -> bool {
        self == OpenState::Open
    }

    pub fn toggled(self) -> Self {
        match self {
            OpenState::Open => OpenState::Closed,
            OpenState::Closed => OpenState::Open,
        }
    }

    /// Value written to the instance's `grid-template-rows` custom property.
    pub fn grid_rows(self) -> &'static str {
        match self {
            OpenState::Open => "1fr",
            OpenState::Closed => "0fr",
        }
    }

    /// The chevron points up while open and is rotated while closed.
    pub fn chevron_rotated(self) -> bool {
        !self.is_open()
    }
}

impl From<bool> for OpenState {
    fn from(open: bool) -> Self {
        Self::from_open(open)
    }
}
