use starter_core::schedule::{FIVE_MINUTE, ScheduleTable, sequence_by_name};
use starter_core::SequencerConfig;

pub const USAGE: &str =
    "Usage: starter-emulator [--schedule <five|three|test>] [--horn-ms N] [--beep-ms N]";

/// Command-line configuration for an emulator session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EmulatorOptions {
    pub schedule: &'static ScheduleTable,
    pub sequencer: SequencerConfig,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self {
            schedule: &FIVE_MINUTE,
            sequencer: SequencerConfig::default(),
        }
    }
}

impl EmulatorOptions {
    /// Parses flags in either `--flag value` or `--flag=value` form.
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| format!("Expected value after {flag}"))
            };

            match flag.as_str() {
                "--schedule" => {
                    let tag = value()?;
                    options.schedule = sequence_by_name(&tag)
                        .ok_or_else(|| format!("Unknown schedule `{tag}`"))?;
                }
                "--horn-ms" => options.sequencer.horn_ms = parse_millis(&flag, &value()?)?,
                "--beep-ms" => options.sequencer.beep_ms = parse_millis(&flag, &value()?)?,
                other => return Err(format!("Unknown argument `{other}`")),
            }
        }

        Ok(options)
    }
}

fn parse_millis(flag: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err(format!("{flag} must be greater than zero")),
        Ok(millis) => Ok(millis),
        Err(err) => Err(format!("Invalid {flag} value `{value}`: {err}")),
    }
}
