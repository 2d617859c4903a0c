//! Run configuration for the `mm_dac` binary.

use crate::LEAF_SIZE;
use crate::error::{MatmulError, Result};
use crate::matrix::compare::EPSILON;
use crate::options::{OptKind, OptSpec, get_options};

/// Flags understood by [`Config::from_args`], in scan order.
pub const SPECS: [OptSpec; 6] = [
    OptSpec::new("-n", OptKind::Int),
    OptSpec::new("-c", OptKind::Bool),
    OptSpec::new("-h", OptKind::Bool),
    OptSpec::new("-b", OptKind::Int),
    OptSpec::new("-t", OptKind::Int),
    OptSpec::new("-s", OptKind::Bool),
];

pub const USAGE: &str = concat!(
    "\nUsage: mm_dac [-n #] [-c] [-b #] [-t #] [-s]\n\n",
    "Multiplies two randomly generated n x n matrices. To check for\n",
    "correctness use -c\n\n",
    "  -n #   matrix side, a power of two (default 2048)\n",
    "  -c     verify against the naive triple-loop product\n",
    "  -b #   leaf block side, a power of two (default 8)\n",
    "  -t #   worker threads, 0 for one per core (default 0)\n",
    "  -s     exit with status 2 when verification fails\n",
    "  -h     print this message\n",
);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Matrix side.
    pub n: usize,
    pub leaf_size: usize,
    /// Check the product against the naive reference.
    pub verify: bool,
    /// Treat a failed verification as a failed run. Off by default: a
    /// wrong result is reported and the process still exits 0.
    pub strict: bool,
    /// Worker threads; 0 lets rayon pick.
    pub threads: usize,
    pub epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n: 2048,
            leaf_size: LEAF_SIZE,
            verify: false,
            strict: false,
            threads: 0,
            epsilon: EPSILON,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Usage,
}

impl Config {
    /// Builds a configuration from a full argument list (program name
    /// first).
    ///
    /// Returns [`Command::Usage`] for `-h`, and also when no arguments are
    /// given at all. Unknown arguments are reported but ignored. Sizes are
    /// range-checked here; power-of-two checks happen when the multiply
    /// runs.
    pub fn from_args<I, S>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv: Vec<String> = args.into_iter().map(Into::into).collect();
        if argv.len() <= 1 {
            return Ok(Command::Usage);
        }

        let parsed = get_options(&mut argv, &SPECS);
        if parsed.flag(2) {
            return Ok(Command::Usage);
        }

        let mut config = Config {
            verify: parsed.flag(1),
            strict: parsed.flag(5),
            ..Config::default()
        };
        if let Some(n) = parsed.int(0) {
            config.n = non_negative("-n", n)?;
        }
        if let Some(b) = parsed.int(3) {
            config.leaf_size = non_negative("-b", b)?;
        }
        if let Some(t) = parsed.int(4) {
            config.threads = non_negative("-t", t)?;
        }
        Ok(Command::Run(config))
    }
}

fn non_negative(flag: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| MatmulError::InvalidArgument {
        flag,
        value: value.to_string(),
    })
}
