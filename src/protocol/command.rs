//! Host command set.
//!
//! Commands arrive as newline-terminated ASCII lines; the leading byte
//! selects the action. Some commands read further parameter lines before
//! responding.

/// A host command selected by its leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `b` - read the instantaneous winding current.
    ReadCurrent,
    /// `c` - read the raw encoder count.
    ReadEncoderCount,
    /// `d` - read the shaft angle in degrees.
    ReadEncoderDegrees,
    /// `e` - zero the encoder, then read the count back.
    ZeroEncoder,
    /// `f` - set an open-loop PWM duty (one integer parameter line).
    SetPwm,
    /// `g` - set current-loop gains (two float parameter lines).
    SetCurrentGains,
    /// `h` - report current-loop gains.
    GetCurrentGains,
    /// `i` - set position-loop gains (three float parameter lines).
    SetPositionGains,
    /// `j` - report position-loop gains.
    GetPositionGains,
    /// `k` - run the current step test and stream the log back.
    RunStepTest,
    /// `l` - hold an angle (one integer parameter line) and stream the log.
    HoldAngle,
    /// `m` or `n` - upload a reference trajectory (length line, then that
    /// many float lines).
    LoadTrajectory,
    /// `o` - track the uploaded trajectory and stream the log back.
    TrackTrajectory,
    /// `p` - force `Idle` and zero the output.
    Stop,
    /// `q` - end the command session.
    Quit,
    /// `r` - report the operating mode as text.
    ReportMode,
}

impl Command {
    /// Decode a command from its selector byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'b' => Some(Command::ReadCurrent),
            b'c' => Some(Command::ReadEncoderCount),
            b'd' => Some(Command::ReadEncoderDegrees),
            b'e' => Some(Command::ZeroEncoder),
            b'f' => Some(Command::SetPwm),
            b'g' => Some(Command::SetCurrentGains),
            b'h' => Some(Command::GetCurrentGains),
            b'i' => Some(Command::SetPositionGains),
            b'j' => Some(Command::GetPositionGains),
            b'k' => Some(Command::RunStepTest),
            b'l' => Some(Command::HoldAngle),
            b'm' | b'n' => Some(Command::LoadTrajectory),
            b'o' => Some(Command::TrackTrajectory),
            b'p' => Some(Command::Stop),
            b'q' => Some(Command::Quit),
            b'r' => Some(Command::ReportMode),
            _ => None,
        }
    }

    /// Decode a command from the leading byte of a line.
    pub fn parse(line: &str) -> Option<Self> {
        line.bytes().next().and_then(Self::from_byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_bytes() {
        assert_eq!(Command::parse("b"), Some(Command::ReadCurrent));
        assert_eq!(Command::parse("k"), Some(Command::RunStepTest));
        assert_eq!(Command::parse("r\n"), Some(Command::ReportMode));
    }

    #[test]
    fn test_m_and_n_both_upload() {
        assert_eq!(Command::parse("m"), Some(Command::LoadTrajectory));
        assert_eq!(Command::parse("n"), Some(Command::LoadTrajectory));
    }

    #[test]
    fn test_unknown_selector() {
        assert_eq!(Command::parse("z"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_only_leading_byte_matters() {
        assert_eq!(Command::parse("background noise"), Some(Command::ReadCurrent));
    }
}
