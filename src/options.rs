//! Linear command-line scanner.
//!
//! Each [`OptSpec`] names a literal flag and the kind of value it carries.
//! The scanner looks every flag up in the argument list, records what it
//! found at the same index as its `OptSpec`, and blanks the argument slots it
//! consumed. Anything left over is reported and returned, but never
//! treated as fatal.

/// Kind of value a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptKind {
    Int,
    Double,
    Long,
    /// Present or absent, no value.
    Bool,
    Str,
    /// Optional `short` / `medium` / `long` value.
    Benchmark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptSpec {
    pub flag: &'static str,
    pub kind: OptKind,
}

impl OptSpec {
    pub const fn new(flag: &'static str, kind: OptKind) -> Self {
        Self { flag, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BenchmarkLength {
    Short = 1,
    Medium = 2,
    Long = 3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    Int(i32),
    Double(f64),
    Long(i64),
    Bool(bool),
    Str(String),
    Benchmark(BenchmarkLength),
}

/// Scanner output, indexed like the `specs` slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedOptions {
    /// `None` when the flag was not given. `Bool` specs always yield a
    /// value.
    pub values: Vec<Option<OptValue>>,
    pub unrecognized: Vec<String>,
}

impl ParsedOptions {
    pub fn int(&self, idx: usize) -> Option<i32> {
        match self.values.get(idx) {
            Some(Some(OptValue::Int(v))) => Some(*v),
            _ => None,
        }
    }

    pub fn double(&self, idx: usize) -> Option<f64> {
        match self.values.get(idx) {
            Some(Some(OptValue::Double(v))) => Some(*v),
            _ => None,
        }
    }

    pub fn long(&self, idx: usize) -> Option<i64> {
        match self.values.get(idx) {
            Some(Some(OptValue::Long(v))) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, idx: usize) -> bool {
        matches!(self.values.get(idx), Some(Some(OptValue::Bool(true))))
    }

    pub fn string(&self, idx: usize) -> Option<&str> {
        match self.values.get(idx) {
            Some(Some(OptValue::Str(v))) => Some(v),
            _ => None,
        }
    }

    pub fn benchmark(&self, idx: usize) -> Option<BenchmarkLength> {
        match self.values.get(idx) {
            Some(Some(OptValue::Benchmark(v))) => Some(*v),
            _ => None,
        }
    }
}

/// Scans `args` (program name at index 0) for every flag in `specs`.
///
/// - Valued kinds (`Int`, `Double`, `Long`, `Str`) look at positions
///   `1..len-1` and take the following argument; the last occurrence wins.
///   Numbers are parsed leniently: the longest numeric prefix, else 0.
/// - `Bool` is true if the flag appears anywhere after position 0.
/// - `Benchmark` is `Medium` when the flag appears. The next argument, if
///   any, is always consumed and selects `Short`, `Medium` or `Long` when
///   it matches one of them.
///
/// Consumed slots are cleared in place. Each remaining non-empty argument
/// is printed as `Invalid option: <arg>`.
pub fn get_options(args: &mut [String], specs: &[OptSpec]) -> ParsedOptions {
    let argc = args.len();
    let mut values = Vec::with_capacity(specs.len());

    for spec in specs {
        let mut value = None;
        match spec.kind {
            OptKind::Int | OptKind::Double | OptKind::Long | OptKind::Str => {
                for i in 1..argc.saturating_sub(1) {
                    if args[i] == spec.flag {
                        value = Some(parse_value(spec.kind, &args[i + 1]));
                        args[i].clear();
                        args[i + 1].clear();
                    }
                }
            }
            OptKind::Bool => {
                let mut present = false;
                for arg in args.iter_mut().skip(1) {
                    if *arg == spec.flag {
                        present = true;
                        arg.clear();
                    }
                }
                value = Some(OptValue::Bool(present));
            }
            OptKind::Benchmark => {
                for i in 1..argc {
                    if args[i] == spec.flag {
                        let mut length = BenchmarkLength::Medium;
                        if i + 1 < argc {
                            match args[i + 1].as_str() {
                                "short" => length = BenchmarkLength::Short,
                                "medium" => length = BenchmarkLength::Medium,
                                "long" => length = BenchmarkLength::Long,
                                _ => {}
                            }
                            args[i + 1].clear();
                        }
                        args[i].clear();
                        value = Some(OptValue::Benchmark(length));
                    }
                }
            }
        }
        values.push(value);
    }

    let mut unrecognized = Vec::new();
    for arg in args.iter().skip(1) {
        if !arg.is_empty() {
            println!("\nInvalid option: {arg}");
            log::warn!("ignoring unrecognized argument {arg:?}");
            unrecognized.push(arg.clone());
        }
    }

    ParsedOptions {
        values,
        unrecognized,
    }
}

fn parse_value(kind: OptKind, raw: &str) -> OptValue {
    match kind {
        OptKind::Int => {
            let v = parse_int_prefix(raw).clamp(i32::MIN as i64, i32::MAX as i64);
            OptValue::Int(v as i32)
        }
        OptKind::Long => OptValue::Long(parse_int_prefix(raw)),
        OptKind::Double => OptValue::Double(parse_float_prefix(raw)),
        OptKind::Str => OptValue::Str(raw.to_string()),
        OptKind::Bool | OptKind::Benchmark => unreachable!("{kind:?} takes no parsed value"),
    }
}

/// Leading `[+-]digits` after optional whitespace, 0 when there are none.
fn parse_int_prefix(raw: &str) -> i64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    s[..end].parse().unwrap_or(if bytes[0] == b'-' { i64::MIN } else { i64::MAX })
}

/// Longest prefix that parses as a float, 0.0 when there is none.
fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&end| s.is_char_boundary(end))
        .find_map(|end| s[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}
