//! The scalar codec table.
//!
//! Fixed, bidirectional conversions for the well-known non-container scalar
//! types: the chrono temporal types, `SystemTime`, UUIDs, bit sets, and the
//! in-crate [`Year`]/[`YearMonth`] (chrono has no counterpart for either).
//! Each entry pairs a canonical textual form with its exact-inverse parser;
//! the bit-set entry is the one non-textual case, converting with a JSON
//! array of ascending set-bit indices.
//!
//! The calendar format used for [`ScalarKind::DateTime`] and
//! [`ScalarKind::Timestamp`] is bespoke rather than RFC 3339: the year is
//! written with its natural digits (no padding), the remaining fields are
//! zero-padded to fixed widths with a 3-digit millisecond part, and the
//! offset suffix is `Z` for zero else a signed `HH:MM`. A `SystemTime`
//! converts through the local zone first, so the emitted offset reflects
//! daylight saving at that instant.
//!
//! The numeric extractors at the bottom ([`json_to_i64`], [`json_to_f64`])
//! are the per-primitive element conversions the deserializer applies to
//! numeric JSON values, including the elements of primitive sequences.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Timelike, Utc,
};
use fixedbitset::FixedBitSet;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reflect::{Reflect, Scalar, Shape};
use crate::ty::{ScalarKind, TypeDesc};
use crate::value::JsonValue;

/// A calendar year.
///
/// Serializes as its natural digits (`"2016"`, `"-44"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(pub i32);

impl Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Year)
    }
}

/// A year-month pair, `"2016-07"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Creates a year-month, rejecting months outside `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then(|| YearMonth { year, month })
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = s.rsplit_once('-').and_then(|(year, month)| {
            let year = year.parse().ok()?;
            let month = month.parse().ok()?;
            YearMonth::new(year, month)
        });
        parsed.ok_or_else(|| Error::data(format!("invalid year-month {:?}", s)))
    }
}

/// Encodes a scalar value into its canonical JSON form.
#[must_use]
pub fn encode(scalar: &Scalar<'_>) -> JsonValue {
    match scalar {
        Scalar::DateTime(dt) => JsonValue::String(format_datetime(dt)),
        Scalar::Timestamp(t) => JsonValue::String(format_timestamp(t)),
        Scalar::Instant(dt) => {
            JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        Scalar::LocalDate(d) => JsonValue::String(d.to_string()),
        Scalar::LocalDateTime(dt) => {
            JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        Scalar::LocalTime(t) => JsonValue::String(t.to_string()),
        Scalar::Year(y) => JsonValue::String(y.to_string()),
        Scalar::YearMonth(ym) => JsonValue::String(ym.to_string()),
        Scalar::Uuid(u) => JsonValue::String(u.to_string()),
        Scalar::Bits(bits) => {
            JsonValue::Array(bits.ones().map(|i| JsonValue::Int(i as i32)).collect())
        }
    }
}

/// Parses the canonical textual form of a string-convertible scalar kind.
///
/// [`ScalarKind::Bits`] has no textual form; asking for one is a structure
/// error. Bit sets are rebuilt from index arrays via [`bits_from_indices`].
pub fn parse(kind: ScalarKind, s: &str) -> Result<Box<dyn Reflect>> {
    match kind {
        ScalarKind::DateTime => Ok(Box::new(parse_datetime(s)?)),
        ScalarKind::Timestamp => Ok(Box::new(parse_timestamp(s)?)),
        ScalarKind::Instant => DateTime::parse_from_rfc3339(s)
            .map(|dt| boxed(dt.with_timezone(&Utc)))
            .map_err(|e| bad_scalar("an instant", s, e)),
        ScalarKind::LocalDate => s
            .parse::<NaiveDate>()
            .map(boxed)
            .map_err(|e| bad_scalar("a local date", s, e)),
        ScalarKind::LocalDateTime => s
            .parse::<NaiveDateTime>()
            .map(boxed)
            .map_err(|e| bad_scalar("a local date-time", s, e)),
        ScalarKind::LocalTime => s
            .parse::<NaiveTime>()
            .map(boxed)
            .map_err(|e| bad_scalar("a local time", s, e)),
        ScalarKind::Year => s
            .parse::<Year>()
            .map(boxed)
            .map_err(|e| bad_scalar("a year", s, e)),
        ScalarKind::YearMonth => s
            .parse::<YearMonth>()
            .map(boxed)
            .map_err(|e| bad_scalar("a year-month", s, e)),
        ScalarKind::Uuid => Uuid::parse_str(s)
            .map(boxed)
            .map_err(|e| bad_scalar("a UUID", s, e)),
        ScalarKind::Bits => Err(Error::structure(
            "a bit set deserializes from an array of indices, not a string",
        )),
    }
}

fn boxed<T: Reflect>(value: T) -> Box<dyn Reflect> {
    Box::new(value)
}

fn bad_scalar(kind: &str, s: &str, err: impl Display) -> Error {
    Error::data(format!("can't parse {:?} as {}: {}", s, kind, err))
}

/// Formats a date-time in the calendar format: unpadded year,
/// `-MM-DDTHH:MM:SS.fff`, then `Z` or a signed `HH:MM` offset.
#[must_use]
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let mut out = String::with_capacity(32);
    out.push_str(&dt.year().to_string());
    out.push('-');
    push2(&mut out, dt.month());
    out.push('-');
    push2(&mut out, dt.day());
    out.push('T');
    push2(&mut out, dt.hour());
    out.push(':');
    push2(&mut out, dt.minute());
    out.push(':');
    push2(&mut out, dt.second());
    out.push('.');
    push3(&mut out, dt.timestamp_subsec_millis());
    let minutes = dt.offset().local_minus_utc() / 60;
    if minutes == 0 {
        out.push('Z');
    } else {
        let (sign, minutes) = if minutes < 0 {
            ('-', -minutes)
        } else {
            ('+', minutes)
        };
        out.push(sign);
        push2(&mut out, (minutes / 60) as u32);
        out.push(':');
        push2(&mut out, (minutes % 60) as u32);
    }
    out
}

fn push2(out: &mut String, n: u32) {
    out.push((b'0' + (n / 10 % 10) as u8) as char);
    out.push((b'0' + (n % 10) as u8) as char);
}

fn push3(out: &mut String, n: u32) {
    out.push((b'0' + (n / 100 % 10) as u8) as char);
    out.push((b'0' + (n / 10 % 10) as u8) as char);
    out.push((b'0' + (n % 10) as u8) as char);
}

/// Parses the calendar format back into a date-time. Exact inverse of
/// [`format_datetime`]; the offset suffix is mandatory.
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>> {
    parse_datetime_inner(s).ok_or_else(|| Error::data(format!("invalid date-time {:?}", s)))
}

fn parse_datetime_inner(s: &str) -> Option<DateTime<FixedOffset>> {
    let (body, offset_secs) = split_offset(s)?;
    let (date, time) = body.split_once('T')?;
    let mut parts = date.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let (hms, frac) = match time.split_once('.') {
        Some((hms, frac)) => (hms, Some(frac)),
        None => (time, None),
    };
    let mut parts = hms.splitn(3, ':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = parts.next()?.parse().ok()?;
    let nanos = match frac {
        None => 0,
        Some(digits) => {
            if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let value: u32 = digits.parse().ok()?;
            value * 10u32.pow(9 - digits.len() as u32)
        }
    };
    let naive = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_nano_opt(hour, minute, second, nanos)?;
    FixedOffset::east_opt(offset_secs)?
        .from_local_datetime(&naive)
        .single()
}

fn split_offset(s: &str) -> Option<(&str, i32)> {
    if let Some(body) = s.strip_suffix('Z') {
        return Some((body, 0));
    }
    let t = s.find('T')?;
    let pos = s[t..].rfind(&['+', '-'][..])? + t;
    let tail = &s[pos..];
    let sign: i32 = if tail.starts_with('-') { -1 } else { 1 };
    let (hours, minutes) = tail[1..].split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    Some((&s[..pos], sign * (hours * 3600 + minutes * 60)))
}

fn format_timestamp(t: &SystemTime) -> String {
    let local: DateTime<Local> = (*t).into();
    format_datetime(&local.fixed_offset())
}

fn parse_timestamp(s: &str) -> Result<SystemTime> {
    let dt = parse_datetime(s)?;
    let secs = dt.timestamp();
    let nanos = dt.timestamp_subsec_nanos();
    let whole = Duration::from_secs(secs.unsigned_abs());
    let base = if secs >= 0 {
        UNIX_EPOCH + whole
    } else {
        UNIX_EPOCH - whole
    };
    Ok(base + Duration::from_nanos(nanos as u64))
}

/// Rebuilds a bit set from a JSON array of set-bit indices.
pub fn bits_from_indices(items: &[JsonValue]) -> Result<Box<dyn Reflect>> {
    let mut bits = FixedBitSet::default();
    for item in items {
        let index = json_to_i64(item)?;
        let index = usize::try_from(index)
            .map_err(|_| Error::data(format!("negative bit index {}", index)))?;
        if index >= bits.len() {
            bits.grow(index + 1);
        }
        bits.insert(index);
    }
    Ok(Box::new(bits))
}

/// Extracts a 64-bit integral from any numeric JSON variant.
///
/// Floating variants must hold an exact in-range integral value.
pub fn json_to_i64(json: &JsonValue) -> Result<i64> {
    match *json {
        JsonValue::Int(n) => Ok(n as i64),
        JsonValue::Long(n) => Ok(n),
        JsonValue::Float(f) => float_to_i64(f as f64),
        JsonValue::Double(d) => float_to_i64(d),
        _ => Err(Error::data(format!(
            "expected a number, found {}",
            json.variant_name()
        ))),
    }
}

fn float_to_i64(value: f64) -> Result<i64> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(Error::data(format!(
            "{} is not an exact 64-bit integral value",
            value
        )))
    }
}

/// Extracts a float from any numeric JSON variant.
pub fn json_to_f64(json: &JsonValue) -> Result<f64> {
    match *json {
        JsonValue::Int(n) => Ok(n as f64),
        JsonValue::Long(n) => Ok(n as f64),
        JsonValue::Float(f) => Ok(f as f64),
        JsonValue::Double(d) => Ok(d),
        _ => Err(Error::data(format!(
            "expected a number, found {}",
            json.variant_name()
        ))),
    }
}

macro_rules! reflect_scalar {
    ($($ty:ty => $kind:ident ($name:literal), |$v:ident| $scalar:expr;)*) => {
        $(
            impl Reflect for $ty {
                fn shape(&self) -> Shape<'_> {
                    let $v = self;
                    Shape::Scalar($scalar)
                }

                fn type_desc() -> TypeDesc {
                    TypeDesc::scalar($name, ScalarKind::$kind)
                }
            }
        )*
    };
}

reflect_scalar! {
    DateTime<FixedOffset> => DateTime ("DateTime<FixedOffset>"), |v| Scalar::DateTime(*v);
    SystemTime => Timestamp ("SystemTime"), |v| Scalar::Timestamp(*v);
    DateTime<Utc> => Instant ("DateTime<Utc>"), |v| Scalar::Instant(*v);
    NaiveDate => LocalDate ("NaiveDate"), |v| Scalar::LocalDate(*v);
    NaiveDateTime => LocalDateTime ("NaiveDateTime"), |v| Scalar::LocalDateTime(*v);
    NaiveTime => LocalTime ("NaiveTime"), |v| Scalar::LocalTime(*v);
    Year => Year ("Year"), |v| Scalar::Year(*v);
    YearMonth => YearMonth ("YearMonth"), |v| Scalar::YearMonth(*v);
    Uuid => Uuid ("Uuid"), |v| Scalar::Uuid(*v);
    FixedBitSet => Bits ("FixedBitSet"), |v| Scalar::Bits(v);
}
