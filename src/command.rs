use {
    ddc::FeatureCode,
    std::fmt::{self, Debug, Display, Formatter},
};

/// A single VCP feature write, addressed to every physical monitor.
///
/// Neither the code nor the value are validated; the monitor (or the OS
/// driver in front of it) decides what is legal.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct VcpCommand {
    /// The VCP feature code
    pub code: FeatureCode,
    /// The new value of the feature
    pub value: u32,
}

impl VcpCommand {
    /// Describe a write of `value` to the feature `code`
    pub const fn new(code: FeatureCode, value: u32) -> Self {
        Self { code, value }
    }
}

impl From<(FeatureCode, u32)> for VcpCommand {
    fn from((code, value): (FeatureCode, u32)) -> Self {
        Self::new(code, value)
    }
}

impl Debug for VcpCommand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("VcpCommand")
            .field("code", &format_args!("{:#04x}", self.code))
            .field("value", &format_args!("{:#x}", self.value))
            .finish()
    }
}

impl Display for VcpCommand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "VCP {:02x}h = {:#x}", self.code, self.value)
    }
}
