/// How `memset` receives its hex payload
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UploadMode {
    /// The command reads the whole payload before returning. Both engines
    /// receive no ticks in the meantime.
    Blocking,
    /// The payload is consumed one character per scheduler iteration while
    /// the engines keep running. Console input is not interpreted until the
    /// upload is complete.
    Interleaved,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// System clock the DAC divider is derived from, in Hz
    pub clock_frequency: u32,
    pub upload: UploadMode,
    /// LEDs show `iteration >> heartbeat_shift` every `1 << heartbeat_shift`
    /// scheduler iterations
    pub heartbeat_shift: u32,
    /// Echo typed characters back to the terminal
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_frequency: 50_000_000,
            upload: UploadMode::Blocking,
            heartbeat_shift: 16,
            echo: true,
        }
    }
}
